//! Classes, groups, modules and exams: the record kinds that carry a display
//! color picked by [`crate::palette`] when they are created.

use serde::Serialize;
use uuid::Uuid;

use crate::db::Db;
use crate::error::ServiceError;
use crate::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Class,
    Group,
    Module,
    Exam,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Class,
        RecordKind::Group,
        RecordKind::Module,
        RecordKind::Exam,
    ];

    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Class => "classes",
            RecordKind::Group => "class_groups",
            RecordKind::Module => "modules",
            RecordKind::Exam => "exams",
        }
    }

    /// Method namespace, e.g. `classes` in `classes.create`.
    pub fn namespace(self) -> &'static str {
        match self {
            RecordKind::Class => "classes",
            RecordKind::Group => "groups",
            RecordKind::Module => "modules",
            RecordKind::Exam => "exams",
        }
    }

    /// Singular key used in create responses.
    pub fn key(self) -> &'static str {
        match self {
            RecordKind::Class => "class",
            RecordKind::Group => "group",
            RecordKind::Module => "module",
            RecordKind::Exam => "exam",
        }
    }

    pub fn from_namespace(ns: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.namespace() == ns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    pub bg_color: String,
    pub created_at: String,
}

pub fn used_colors(db: &Db, kind: RecordKind) -> Result<Vec<String>, ServiceError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT bg_color FROM {} WHERE bg_color <> ''",
            kind.table()
        ))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Picks a color against the current siblings, then inserts. The read and the
/// insert are separate lock acquisitions, so two creations racing each other
/// can land on the same color.
pub fn create_record(
    db: &Db,
    kind: RecordKind,
    palette: &Palette,
    name: &str,
) -> Result<Record, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("name must not be empty".into()));
    }

    let used = used_colors(db, kind)?;
    let record = Record {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        bg_color: palette.assign(&used)?,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    db.with_conn(|conn| {
        conn.execute(
            &format!(
                "INSERT INTO {}(id, name, bg_color, created_at) VALUES(?, ?, ?, ?)",
                kind.table()
            ),
            (&record.id, &record.name, &record.bg_color, &record.created_at),
        )
    })?;

    Ok(record)
}

pub fn list_records(db: &Db, kind: RecordKind) -> Result<Vec<Record>, ServiceError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name, bg_color, created_at FROM {} ORDER BY created_at, name",
            kind.table()
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Record {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    bg_color: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

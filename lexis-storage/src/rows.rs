//! Row mapping between entity tables and [`Entity`] values.

use crate::error::{StorageError, StorageResult};
use lexis_model::{Entity, EntityKind, Term, TermKind, Vocabulary};
use lexis_types::{EntityId, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

fn entity_id(raw: i64) -> StorageResult<EntityId> {
    EntityId::new(raw).map_err(|e| StorageError::InvalidData(e.to_string()))
}

fn user_id(raw: Option<i64>) -> StorageResult<Option<UserId>> {
    raw.map(|r| UserId::new(r).map_err(|e| StorageError::InvalidData(e.to_string())))
        .transpose()
}

struct VocabularyRow {
    id: i64,
    owner_id: Option<i64>,
    namespace_uri: String,
    prefix: String,
    label: String,
    comment: Option<String>,
}

struct TermRow {
    id: i64,
    owner_id: Option<i64>,
    vocabulary_id: i64,
    local_name: String,
    label: String,
    comment: Option<String>,
}

impl TermRow {
    const COLUMNS: &'static str = "id, owner_id, vocabulary_id, local_name, label, comment";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            vocabulary_id: row.get(2)?,
            local_name: row.get(3)?,
            label: row.get(4)?,
            comment: row.get(5)?,
        })
    }

    fn into_term(self, kind: TermKind) -> StorageResult<Term> {
        Ok(Term {
            kind,
            id: Some(entity_id(self.id)?),
            vocabulary_id: Some(entity_id(self.vocabulary_id)?),
            owner: user_id(self.owner_id)?,
            local_name: self.local_name,
            label: self.label,
            comment: self.comment,
        })
    }
}

// ── Loading ──────────────────────────────────────────────────────

pub(crate) fn load_entity(
    conn: &Connection,
    kind: EntityKind,
    id: EntityId,
) -> StorageResult<Option<Entity>> {
    match kind.term_kind() {
        None => Ok(load_vocabulary(conn, id)?.map(Entity::from)),
        Some(term_kind) => Ok(load_term(conn, term_kind, id)?.map(Entity::from)),
    }
}

fn load_vocabulary(conn: &Connection, id: EntityId) -> StorageResult<Option<Vocabulary>> {
    let row = conn
        .query_row(
            "SELECT id, owner_id, namespace_uri, prefix, label, comment
             FROM vocabulary WHERE id = ?1",
            params![i64::from(id)],
            |row| {
                Ok(VocabularyRow {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    namespace_uri: row.get(2)?,
                    prefix: row.get(3)?,
                    label: row.get(4)?,
                    comment: row.get(5)?,
                })
            },
        )
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };

    let mut vocabulary = Vocabulary {
        id: Some(entity_id(row.id)?),
        owner: user_id(row.owner_id)?,
        namespace_uri: row.namespace_uri,
        prefix: row.prefix,
        label: row.label,
        comment: row.comment,
        resource_classes: Vec::new(),
        properties: Vec::new(),
    };
    for kind in TermKind::ALL {
        for term in load_terms_of(conn, kind, id)? {
            vocabulary.add_term(term);
        }
    }
    Ok(Some(vocabulary))
}

fn load_term(conn: &Connection, kind: TermKind, id: EntityId) -> StorageResult<Option<Term>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?1", TermRow::COLUMNS, kind.as_str());
    conn.query_row(&sql, params![i64::from(id)], TermRow::from_row)
        .optional()?
        .map(|row| row.into_term(kind))
        .transpose()
}

fn load_terms_of(conn: &Connection, kind: TermKind, vocabulary: EntityId) -> StorageResult<Vec<Term>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE vocabulary_id = ?1 ORDER BY id",
        TermRow::COLUMNS,
        kind.as_str()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![i64::from(vocabulary)], TermRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(|row| row.into_term(kind)).collect()
}

// ── Saving ───────────────────────────────────────────────────────

/// Inserts or updates `entity`, assigning ids to new rows.
///
/// A vocabulary's unsaved terms are inserted with it. Terms that already
/// have an id are left alone.
pub(crate) fn save_entity(conn: &Connection, entity: &mut Entity) -> StorageResult<()> {
    match entity {
        Entity::Vocabulary(vocabulary) => save_vocabulary(conn, vocabulary),
        Entity::ResourceClass(term) | Entity::Property(term) => save_term(conn, term),
    }
}

fn save_vocabulary(conn: &Connection, vocabulary: &mut Vocabulary) -> StorageResult<()> {
    let owner = vocabulary.owner.map(i64::from);
    let id = match vocabulary.id {
        Some(id) => {
            conn.execute(
                "UPDATE vocabulary
                 SET owner_id = ?2, namespace_uri = ?3, prefix = ?4, label = ?5, comment = ?6
                 WHERE id = ?1",
                params![
                    i64::from(id),
                    owner,
                    vocabulary.namespace_uri,
                    vocabulary.prefix,
                    vocabulary.label,
                    vocabulary.comment,
                ],
            )?;
            id
        }
        None => {
            conn.execute(
                "INSERT INTO vocabulary (owner_id, namespace_uri, prefix, label, comment)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    owner,
                    vocabulary.namespace_uri,
                    vocabulary.prefix,
                    vocabulary.label,
                    vocabulary.comment,
                ],
            )?;
            let id = entity_id(conn.last_insert_rowid())?;
            vocabulary.id = Some(id);
            id
        }
    };

    let terms = vocabulary
        .resource_classes
        .iter_mut()
        .chain(vocabulary.properties.iter_mut());
    for term in terms.filter(|t| t.id.is_none()) {
        term.vocabulary_id = Some(id);
        save_term(conn, term)?;
    }
    debug!(vocabulary = %id, prefix = %vocabulary.prefix, "Saved vocabulary");
    Ok(())
}

fn save_term(conn: &Connection, term: &mut Term) -> StorageResult<()> {
    let vocabulary_id = term.vocabulary_id.ok_or_else(|| {
        StorageError::InvalidData(format!("{} '{}' has no vocabulary", term.kind, term.local_name))
    })?;
    let table = term.kind.as_str();
    let owner = term.owner.map(i64::from);

    match term.id {
        Some(id) => {
            conn.execute(
                &format!(
                    "UPDATE {table}
                     SET owner_id = ?2, vocabulary_id = ?3, local_name = ?4, label = ?5, comment = ?6
                     WHERE id = ?1"
                ),
                params![
                    i64::from(id),
                    owner,
                    i64::from(vocabulary_id),
                    term.local_name,
                    term.label,
                    term.comment,
                ],
            )?;
        }
        None => {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (owner_id, vocabulary_id, local_name, label, comment)
                     VALUES (?1, ?2, ?3, ?4, ?5)"
                ),
                params![
                    owner,
                    i64::from(vocabulary_id),
                    term.local_name,
                    term.label,
                    term.comment,
                ],
            )?;
            term.id = Some(entity_id(conn.last_insert_rowid())?);
        }
    }
    Ok(())
}

// ── Deleting ─────────────────────────────────────────────────────

/// Deletes a row. Returns false if it did not exist.
pub(crate) fn delete_entity(conn: &Connection, kind: EntityKind, id: EntityId) -> StorageResult<bool> {
    let deleted = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", kind.as_str()),
        params![i64::from(id)],
    )?;
    Ok(deleted > 0)
}

// 🗄️ Catalog Store - SQLite tables, CSV ingestion and the SQL-backed Catalog
//
// One table per family. Every row carries a SHA-256 record_hash over its
// identifying fields, so importing the same CSV twice inserts nothing new.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::catalog::{
    check_predicates, AgentRecord, Catalog, CatalogRecord, ContainerRecord, Family, KnifeSkin,
    Predicate, Side, SkinKind, SkinRecord, SkinType, StickerRecord, StickerType, ToolRecord,
};
use crate::error::CatalogError;
use crate::names::{Quality, QualitySet};

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Quality flags are one column per wear so a quality filter is a plain
    // column test.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS skins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_hash TEXT UNIQUE NOT NULL,
            skin_type TEXT NOT NULL,
            skin TEXT,
            full_name TEXT NOT NULL,
            \"fn\" INTEGER NOT NULL DEFAULT 0,
            mw INTEGER NOT NULL DEFAULT 0,
            ft INTEGER NOT NULL DEFAULT 0,
            ww INTEGER NOT NULL DEFAULT 0,
            bs INTEGER NOT NULL DEFAULT 0,
            stattrak INTEGER NOT NULL DEFAULT 0,
            souvenir INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS containers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_hash TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS agents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_hash TEXT UNIQUE NOT NULL,
            side TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS stickers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_hash TEXT UNIQUE NOT NULL,
            sticker_type TEXT NOT NULL,
            full_name TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS tools (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_hash TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Import audit trail
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS import_runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id TEXT UNIQUE NOT NULL,
            family TEXT NOT NULL,
            source_file TEXT NOT NULL,
            inserted INTEGER NOT NULL,
            skipped INTEGER NOT NULL,
            imported_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_skins_type ON skins(skin_type)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_agents_side ON agents(side)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_stickers_type ON stickers(sticker_type)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_import_runs_family ON import_runs(family)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// CSV ROWS
// ============================================================================

/// Accepts true/false, 1/0, yes/no; empty means false
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("not a boolean: {}", other))),
    }
}

#[derive(Debug, Deserialize)]
struct SkinRow {
    skin_type: SkinType,
    skin: Option<String>,
    full_name: String,
    qualities: QualitySet,
    #[serde(deserialize_with = "flag")]
    stattrak: bool,
    #[serde(deserialize_with = "flag")]
    souvenir: bool,
}

impl SkinRow {
    fn into_record(self, line: usize) -> Result<SkinRecord> {
        let pattern = self.skin.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let kind = match (self.skin_type, pattern) {
            (SkinType::Gun, Some(pattern_name)) => SkinKind::Gun { pattern_name },
            (SkinType::Glove, Some(pattern_name)) => SkinKind::Glove { pattern_name },
            (SkinType::Knife, Some(pattern_name)) => {
                SkinKind::Knife(KnifeSkin::Patterned { pattern_name })
            }
            (SkinType::Knife, None) => {
                if self.souvenir {
                    anyhow::bail!(
                        "line {}: Vanilla knife '{}' cannot be Souvenir",
                        line,
                        self.full_name
                    );
                }
                SkinKind::Knife(KnifeSkin::Vanilla)
            }
            (skin_type, None) => anyhow::bail!(
                "line {}: {} '{}' has no pattern (only knives can be Vanilla)",
                line,
                skin_type.as_str(),
                self.full_name
            ),
        };

        Ok(SkinRecord {
            full_name: self.full_name,
            kind,
            qualities: self.qualities,
            stattrak: self.stattrak,
            souvenir: self.souvenir,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NameRow {
    name: String,
}

/// Deserialize every row, tagging each with its 1-based file line
fn read_rows<T: DeserializeOwned>(csv_path: &Path) -> Result<Vec<(usize, T)>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        // header is line 1
        let line = index + 2;
        let row: T = result.with_context(|| format!("line {}: failed to deserialize row", line))?;
        rows.push((line, row));
    }
    Ok(rows)
}

/// Read one family's CSV export into catalog records
pub fn load_csv(family: Family, csv_path: &Path) -> Result<Vec<CatalogRecord>> {
    let records = match family {
        Family::Skin => read_rows::<SkinRow>(csv_path)?
            .into_iter()
            .map(|(line, row)| row.into_record(line).map(CatalogRecord::Skin))
            .collect::<Result<Vec<_>>>()?,
        Family::Container => read_rows::<NameRow>(csv_path)?
            .into_iter()
            .map(|(_, row)| CatalogRecord::Container(ContainerRecord { name: row.name }))
            .collect(),
        Family::Agent => read_rows::<AgentRecord>(csv_path)?
            .into_iter()
            .map(|(_, row)| CatalogRecord::Agent(row))
            .collect(),
        Family::Sticker => read_rows::<StickerRecord>(csv_path)?
            .into_iter()
            .map(|(_, row)| CatalogRecord::Sticker(row))
            .collect(),
        Family::Tool => read_rows::<NameRow>(csv_path)?
            .into_iter()
            .map(|(_, row)| CatalogRecord::Tool(ToolRecord { name: row.name }))
            .collect(),
    };

    Ok(records)
}

// ============================================================================
// INSERTION
// ============================================================================

/// SHA-256 over the fields that identify a catalog row
pub fn compute_record_hash(record: &CatalogRecord) -> String {
    let key = match record {
        CatalogRecord::Skin(skin) => {
            format!("skin|{}|{}", skin.skin_type().as_str(), skin.full_name)
        }
        CatalogRecord::Container(container) => format!("container|{}", container.name),
        CatalogRecord::Agent(agent) => format!("agent|{}|{}", agent.side.as_str(), agent.name),
        CatalogRecord::Sticker(sticker) => {
            format!("sticker|{}|{}", sticker.sticker_type.as_str(), sticker.full_name)
        }
        CatalogRecord::Tool(tool) => format!("tool|{}", tool.name),
    };

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub inserted: usize,
    pub skipped: usize,
}

fn insert_record(conn: &Connection, hash: &str, record: &CatalogRecord) -> rusqlite::Result<usize> {
    match record {
        CatalogRecord::Skin(skin) => {
            let has = |q: Quality| skin.qualities.contains(q);
            conn.execute(
                "INSERT INTO skins (
                    record_hash, skin_type, skin, full_name,
                    \"fn\", mw, ft, ww, bs, stattrak, souvenir
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    hash,
                    skin.skin_type().as_str(),
                    skin.pattern_name(),
                    skin.full_name,
                    has(Quality::FactoryNew),
                    has(Quality::MinimalWear),
                    has(Quality::FieldTested),
                    has(Quality::WellWorn),
                    has(Quality::BattleScarred),
                    skin.stattrak,
                    skin.souvenir,
                ],
            )
        }
        CatalogRecord::Container(container) => conn.execute(
            "INSERT INTO containers (record_hash, name) VALUES (?1, ?2)",
            params![hash, container.name],
        ),
        CatalogRecord::Agent(agent) => conn.execute(
            "INSERT INTO agents (record_hash, side, name) VALUES (?1, ?2, ?3)",
            params![hash, agent.side.as_str(), agent.name],
        ),
        CatalogRecord::Sticker(sticker) => conn.execute(
            "INSERT INTO stickers (record_hash, sticker_type, full_name) VALUES (?1, ?2, ?3)",
            params![hash, sticker.sticker_type.as_str(), sticker.full_name],
        ),
        CatalogRecord::Tool(tool) => conn.execute(
            "INSERT INTO tools (record_hash, name) VALUES (?1, ?2)",
            params![hash, tool.name],
        ),
    }
}

/// Insert records, skipping any whose hash is already stored
pub fn insert_records(conn: &Connection, records: &[CatalogRecord]) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for record in records {
        let hash = compute_record_hash(record);

        match insert_record(conn, &hash, record) {
            Ok(_) => stats.inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                stats.skipped += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to insert {} '{}'", record.family(), record.search_text())
                })
            }
        }
    }

    Ok(stats)
}

// ============================================================================
// IMPORT RUNS (audit trail)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRun {
    pub run_id: String,
    pub family: Family,
    pub source_file: String,
    pub inserted: i64,
    pub skipped: i64,
    pub imported_at: DateTime<Utc>,
}

impl ImportRun {
    pub fn new(family: Family, source_file: &str, stats: ImportStats) -> Self {
        ImportRun {
            run_id: uuid::Uuid::new_v4().to_string(),
            family,
            source_file: source_file.to_string(),
            inserted: stats.inserted as i64,
            skipped: stats.skipped as i64,
            imported_at: Utc::now(),
        }
    }
}

pub fn record_import(conn: &Connection, run: &ImportRun) -> Result<()> {
    conn.execute(
        "INSERT INTO import_runs (
            run_id, family, source_file, inserted, skipped, imported_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            run.run_id,
            run.family.table(),
            run.source_file,
            run.inserted,
            run.skipped,
            run.imported_at.to_rfc3339(),
        ],
    )?;

    Ok(())
}

/// All import runs, newest first
pub fn get_import_runs(conn: &Connection) -> Result<Vec<ImportRun>> {
    let mut stmt = conn.prepare(
        "SELECT run_id, family, source_file, inserted, skipped, imported_at
         FROM import_runs
         ORDER BY id DESC",
    )?;

    let runs = stmt
        .query_map([], |row| {
            let family: String = row.get(1)?;
            let imported_at: String = row.get(5)?;

            Ok(ImportRun {
                run_id: row.get(0)?,
                family: Family::from_name(&family)
                    .ok_or_else(|| bad_column(1, format!("unknown family: {}", family)))?,
                source_file: row.get(2)?,
                inserted: row.get(3)?,
                skipped: row.get(4)?,
                imported_at: DateTime::parse_from_rfc3339(&imported_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| bad_column(5, e.to_string()))?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(runs)
}

/// Load, insert and audit one CSV file
pub fn import_csv(conn: &Connection, family: Family, csv_path: &Path) -> Result<ImportStats> {
    let records = load_csv(family, csv_path)?;
    let stats = insert_records(conn, &records)?;

    let run = ImportRun::new(family, &csv_path.display().to_string(), stats);
    record_import(conn, &run)?;

    info!(
        "imported {} from {}: {} inserted, {} skipped",
        family,
        csv_path.display(),
        stats.inserted,
        stats.skipped
    );
    if stats.skipped > 0 {
        warn!("{} {} rows were already present", stats.skipped, family);
    }

    Ok(stats)
}

pub fn verify_count(conn: &Connection, family: Family) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", family.table());
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// SQL CATALOG
// ============================================================================

fn bad_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

fn select_columns(family: Family) -> &'static str {
    match family {
        Family::Skin => {
            "skin_type, skin, full_name, \"fn\", mw, ft, ww, bs, stattrak, souvenir"
        }
        Family::Container | Family::Tool => "name",
        Family::Agent => "side, name",
        Family::Sticker => "sticker_type, full_name",
    }
}

/// SQLite's built-in lower() folds ASCII only
const UNICODE_LOWER: &str = "unicode_lower";

/// Register the Unicode-aware lowercase function containment filters use
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
    )
}

/// One WHERE fragment plus its bound values
fn predicate_sql(family: Family, predicate: &Predicate, values: &mut Vec<Value>) -> String {
    match predicate {
        Predicate::Quality(quality) => format!("\"{}\" = 1", quality.code()),
        Predicate::StatTrak(flag) => {
            values.push(Value::Integer(*flag as i64));
            "stattrak = ?".to_string()
        }
        Predicate::Souvenir(flag) => {
            values.push(Value::Integer(*flag as i64));
            "souvenir = ?".to_string()
        }
        Predicate::SkinType(skin_type) => {
            values.push(Value::Text(skin_type.as_str().to_string()));
            "skin_type = ?".to_string()
        }
        Predicate::Vanilla => "(skin_type = 'knife' AND skin IS NULL)".to_string(),
        Predicate::Side(side) => {
            values.push(Value::Text(side.as_str().to_string()));
            "side = ?".to_string()
        }
        Predicate::StickerTypeIn(types) if types.is_empty() => "0".to_string(),
        Predicate::StickerTypeIn(types) => {
            let marks = vec!["?"; types.len()].join(", ");
            values.extend(types.iter().map(|t| Value::Text(t.as_str().to_string())));
            format!("sticker_type IN ({})", marks)
        }
        Predicate::Contains(needle) => {
            values.push(Value::Text(needle.clone()));
            format!("instr({}({}), ?) > 0", UNICODE_LOWER, family.search_column())
        }
    }
}

/// Build the parameterised lookup for one family
fn build_query(family: Family, predicates: &[Predicate]) -> (String, Vec<Value>) {
    let mut values = Vec::new();
    let mut sql = format!("SELECT {} FROM {}", select_columns(family), family.table());

    if !predicates.is_empty() {
        let clauses: Vec<String> = predicates
            .iter()
            .map(|p| predicate_sql(family, p, &mut values))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id");

    (sql, values)
}

fn decode_row(family: Family, row: &Row<'_>) -> rusqlite::Result<CatalogRecord> {
    match family {
        Family::Skin => {
            let skin_type: String = row.get(0)?;
            let skin_type = SkinType::parse(&skin_type)
                .ok_or_else(|| bad_column(0, format!("unknown skin_type: {}", skin_type)))?;
            let pattern: Option<String> = row.get(1)?;

            let mut qualities = QualitySet::empty();
            for (offset, quality) in Quality::ALL.into_iter().enumerate() {
                if row.get::<_, bool>(3 + offset)? {
                    qualities.insert(quality);
                }
            }

            let kind = match (skin_type, pattern) {
                (SkinType::Gun, pattern) => SkinKind::Gun {
                    pattern_name: pattern.unwrap_or_default(),
                },
                (SkinType::Glove, pattern) => SkinKind::Glove {
                    pattern_name: pattern.unwrap_or_default(),
                },
                (SkinType::Knife, Some(pattern_name)) => {
                    SkinKind::Knife(KnifeSkin::Patterned { pattern_name })
                }
                (SkinType::Knife, None) => SkinKind::Knife(KnifeSkin::Vanilla),
            };

            Ok(CatalogRecord::Skin(SkinRecord {
                full_name: row.get(2)?,
                kind,
                qualities,
                stattrak: row.get(8)?,
                souvenir: row.get(9)?,
            }))
        }
        Family::Container => Ok(CatalogRecord::Container(ContainerRecord {
            name: row.get(0)?,
        })),
        Family::Agent => {
            let side: String = row.get(0)?;
            Ok(CatalogRecord::Agent(AgentRecord {
                side: Side::parse(&side)
                    .ok_or_else(|| bad_column(0, format!("unknown side: {}", side)))?,
                name: row.get(1)?,
            }))
        }
        Family::Sticker => {
            let sticker_type: String = row.get(0)?;
            Ok(CatalogRecord::Sticker(StickerRecord {
                sticker_type: StickerType::parse(&sticker_type).ok_or_else(|| {
                    bad_column(0, format!("unknown sticker_type: {}", sticker_type))
                })?,
                full_name: row.get(1)?,
            }))
        }
        Family::Tool => Ok(CatalogRecord::Tool(ToolRecord { name: row.get(0)? })),
    }
}

/// Catalog backed by the SQLite store; one connection shared behind a mutex
#[derive(Clone)]
pub struct SqliteCatalog {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalog {
    /// Open (or create) the catalog file and make sure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open catalog database: {}", path.display()))?;
        setup_database(&conn)?;
        SqliteCatalog::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        SqliteCatalog::from_connection(conn)
    }

    /// Wrap an existing connection; the schema must already be set up
    pub fn from_connection(conn: Connection) -> Result<Self> {
        register_functions(&conn).context("Failed to register catalog SQL functions")?;
        Ok(SqliteCatalog {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` with the locked connection (imports, stats)
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&Connection) -> T,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog connection lock poisoned".to_string()))?;
        Ok(f(&conn))
    }

    /// Row count for every family
    pub fn counts(&self) -> Result<Vec<(Family, i64)>, CatalogError> {
        self.with_connection(|conn| {
            Family::ALL
                .into_iter()
                .map(|family| {
                    let sql = format!("SELECT COUNT(*) FROM {}", family.table());
                    conn.query_row(&sql, [], |row| row.get(0))
                        .map(|count| (family, count))
                })
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .map_err(CatalogError::from)
    }
}

impl Catalog for SqliteCatalog {
    fn find(
        &self,
        family: Family,
        predicates: &[Predicate],
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        check_predicates(family, predicates)?;
        let (sql, values) = build_query(family, predicates);

        self.with_connection(|conn| -> rusqlite::Result<Vec<CatalogRecord>> {
            let mut stmt = conn.prepare_cached(&sql)?;
            let records = stmt
                .query_map(params_from_iter(values.iter()), |row| decode_row(family, row))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })?
        .map_err(CatalogError::from)
    }
}

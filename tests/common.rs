#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use boardsync::api::{BoardApi, ColumnValues, ItemsPage, RawColumnValue, RawItem};
use boardsync::errors::ApiError;
use boardsync::models::{BoardItem, MasterRecord};
use rusqlite::Connection;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

pub fn bsync() -> Command {
    cargo_bin_cmd!("boardsync")
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// Plain-text sink for the tracing events of the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route this thread's events here until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Captured lines containing `needle`.
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| l.contains(needle))
            .map(String::from)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// Scripted board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Page {
        cursor: Option<String>,
    },
    Create {
        name: String,
        values: ColumnValues,
    },
    Update {
        item_id: String,
        values: ColumnValues,
    },
}

/// In-memory board: pages are served in script order, writes are recorded.
///
/// Once the script is exhausted every page request returns an empty last
/// page. Writes whose item name or item id is listed in `failing` return
/// an HTTP 500. The next `throttled` writes of any kind are rate limited.
#[derive(Default)]
pub struct FakeBoard {
    pages: Mutex<VecDeque<Result<ItemsPage, ApiError>>>,
    failing: Vec<String>,
    throttled: Mutex<u32>,
    calls: Mutex<Vec<(Instant, Call)>>,
    next_id: Mutex<u64>,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<RawItem>) -> Self {
        Self::new().page(items, None)
    }

    pub fn page(self, items: Vec<RawItem>, cursor: Option<&str>) -> Self {
        self.push(Ok(ItemsPage {
            cursor: cursor.map(String::from),
            items,
        }))
    }

    pub fn error(self, err: ApiError) -> Self {
        self.push(Err(err))
    }

    pub fn failing_on(mut self, name_or_id: &str) -> Self {
        self.failing.push(name_or_id.to_string());
        self
    }

    pub fn throttle_writes(self, count: u32) -> Self {
        *self.throttled.lock().unwrap() = count;
        self
    }

    fn push(self, page: Result<ItemsPage, ApiError>) -> Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn page_cursors(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Page { cursor } => Some(cursor),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Page { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    fn check_failure(&self, target: &str) -> Result<(), ApiError> {
        let mut throttled = self.throttled.lock().unwrap();
        if *throttled > 0 {
            *throttled -= 1;
            return Err(rate_limited());
        }
        if self.failing.iter().any(|f| f == target) {
            Err(ApiError::Status {
                status: 500,
                body: format!("write of {target} rejected"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BoardApi for FakeBoard {
    async fn items_page(
        &self,
        _board_id: &str,
        _limit: u32,
        cursor: Option<&str>,
    ) -> Result<ItemsPage, ApiError> {
        self.record(Call::Page {
            cursor: cursor.map(String::from),
        });
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ItemsPage::default()))
    }

    async fn create_item(
        &self,
        _board_id: &str,
        item_name: &str,
        column_values: &ColumnValues,
    ) -> Result<String, ApiError> {
        self.record(Call::Create {
            name: item_name.to_string(),
            values: column_values.clone(),
        });
        self.check_failure(item_name)?;
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Ok(format!("new-{}", *next))
    }

    async fn change_column_values(
        &self,
        _board_id: &str,
        item_id: &str,
        column_values: &ColumnValues,
    ) -> Result<String, ApiError> {
        self.record(Call::Update {
            item_id: item_id.to_string(),
            values: column_values.clone(),
        });
        self.check_failure(item_id)?;
        Ok(item_id.to_string())
    }
}

pub fn rate_limited() -> ApiError {
    ApiError::RateLimited("Complexity budget exhausted".to_string())
}

// ---------------------------------------------------------------------------
// Board items
// ---------------------------------------------------------------------------

fn col(id: &str, text: Option<&str>, value: Option<&str>) -> RawColumnValue {
    RawColumnValue {
        id: id.to_string(),
        text: text.map(String::from),
        value: value.map(String::from),
    }
}

fn text_col(id: &str, text: &str) -> RawColumnValue {
    col(id, Some(text), Some(&format!("\"{text}\"")))
}

/// Board item matching `material(code)` field by field.
pub fn material_raw(id: &str, code: &str) -> RawItem {
    RawItem {
        id: id.to_string(),
        name: code.to_string(),
        column_values: vec![
            text_col("text_mkpvpe8r", "Steel coil"),
            text_col("text_mkqyt4a5", "Coil 1.2mm"),
            text_col("text_mkpv3d2x", "MG01"),
            text_col("text_mkpvst42", "EXT1"),
            col("color_mkpvaacs", Some("KG"), Some(r#"{"index":1}"#)),
            text_col("numeric_mkpv4yay", "125.5"),
            text_col("numeric_mkpvc027", "130"),
            col(
                "date_mkpvwj4m",
                Some("2025-04-18"),
                Some(r#"{"date":"2025-04-18","changed_at":"2025-04-18T08:00:00Z"}"#),
            ),
            text_col("text_mkqy4v4n", "INV-1"),
            col("color_mkqywq0b", None, None),
        ],
    }
}

pub fn material_item(id: &str, code: &str) -> BoardItem {
    BoardItem::from_raw(material_raw(id, code))
}

/// Replace the raw value of one column of an item.
pub fn set_column(mut item: RawItem, column_id: &str, text: &str, value: &str) -> RawItem {
    for c in &mut item.column_values {
        if c.id == column_id {
            c.text = Some(text.to_string());
            c.value = Some(value.to_string());
        }
    }
    item
}

/// Numbered material items `first..first+count`, all in sync with `material`.
pub fn material_batch(first: u64, count: u64) -> Vec<RawItem> {
    (first..first + count)
        .map(|n| material_raw(&format!("id{n}"), &n.to_string()))
        .collect()
}

pub fn customer_raw(id: &str, code: &str, name: &str) -> RawItem {
    RawItem {
        id: id.to_string(),
        name: name.to_string(),
        column_values: vec![
            text_col("metin3", name),
            text_col("metin4", code),
            text_col("metin17", "BURSA"),
            text_col("metin1", "TR"),
            text_col("dup__of_metin", "Türkiye"),
            col("durum1", Some("OTOMOTIV"), Some(r#"{"index":3}"#)),
            col("durum2", Some("10"), Some(r#"{"index":3}"#)),
            col("durum", Some("1000"), Some(r#"{"index":3}"#)),
            col("color_mkt2p04q", None, None),
        ],
    }
}

// ---------------------------------------------------------------------------
// View records
// ---------------------------------------------------------------------------

pub fn material(code: &str) -> MasterRecord {
    MasterRecord::new(code)
        .with("material_code", code)
        .with("material_name", "Steel coil")
        .with("standard_description", "Coil 1.2mm")
        .with("material_group", "MG01")
        .with("external_material_group", "EXT1")
        .with("base_unit", "KG")
        .with("net_weight", 125.5)
        .with("gross_weight", 130.0)
        .with("last_invoice_date", "2025-04-18")
        .with("last_invoice_no", "INV-1")
        .with("deletion_flag", None::<&str>)
}

pub fn customer(code: &str, name: &str) -> MasterRecord {
    MasterRecord::new(code)
        .with("customer_code", code)
        .with("customer_name", name)
        .with("city", "BURSA")
        .with("country_code", "TR")
        .with("country_name", "Türkiye")
        .with("sector", "OTOMOTIV")
        .with("distribution_channel", "10")
        .with("sales_org", "1000")
        .with("deletion_flag", None::<&str>)
}

// ---------------------------------------------------------------------------
// SQLite fixtures
// ---------------------------------------------------------------------------

/// Source table plus the reporting view the materials domain reads.
pub fn create_material_view(conn: &Connection) {
    conn.execute_batch(
        r#"
        CREATE TABLE erp_materials (
            matnr   TEXT,
            maktx   TEXT,
            descr   TEXT,
            matkl   TEXT,
            extwg   TEXT,
            meins   TEXT,
            ntgew   REAL,
            brgew   REAL,
            inv_dt  TEXT,
            inv_no  TEXT,
            lvorm   TEXT
        );
        CREATE VIEW material_master_v AS
            SELECT matnr  AS material_code,
                   maktx  AS material_name,
                   descr  AS standard_description,
                   matkl  AS material_group,
                   extwg  AS external_material_group,
                   meins  AS base_unit,
                   ntgew  AS net_weight,
                   brgew  AS gross_weight,
                   inv_dt AS last_invoice_date,
                   inv_no AS last_invoice_no,
                   lvorm  AS deletion_flag
              FROM erp_materials;
        "#,
    )
    .unwrap();
}

/// Insert a material that matches `material_raw` unless `name` differs.
pub fn insert_material(conn: &Connection, code: &str, name: &str, unit: &str) {
    conn.execute(
        "INSERT INTO erp_materials
         VALUES (?1, ?2, 'Coil 1.2mm', 'MG01', 'EXT1', ?3, 125.5, 130.0, '18.04.2025', 'INV-1', NULL)",
        rusqlite::params![code, name, unit],
    )
    .unwrap();
}

pub fn memory_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    boardsync::db::initialize::init_db(&conn).unwrap();
    conn
}

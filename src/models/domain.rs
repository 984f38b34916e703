use super::mapping::{FieldKind, FieldMapping, FieldSpec, KeySource, StatusOptions};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

pub const MATERIALS_VIEW: &str = "material_master_v";
pub const CUSTOMERS_VIEW: &str = "customer_master_v";

/// Option index the boards use for "marked for deletion".
pub const DELETION_FLAG_INDEX: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Materials,
    Customers,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Materials => "materials",
            Domain::Customers => "customers",
        }
    }

    pub fn default_view(&self) -> &'static str {
        match self {
            Domain::Materials => MATERIALS_VIEW,
            Domain::Customers => CUSTOMERS_VIEW,
        }
    }

    /// Field mapping of this domain, reading from `view`.
    pub fn mapping(&self, view: &str) -> FieldMapping {
        let mut mapping = match self {
            Domain::Materials => materials(),
            Domain::Customers => customers(),
        };
        mapping.source_view = view.to_string();
        mapping
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn deletion_flag(column_id: &str) -> FieldSpec {
    FieldSpec::new(
        "deletion_flag",
        "deletion_flag",
        column_id,
        FieldKind::Status(StatusOptions::new(&[("X", DELETION_FLAG_INDEX)])),
    )
    .clear_on_null()
}

/// Material master board: the item name is the material code.
pub fn materials() -> FieldMapping {
    let text = |name: &str, column_id: &str| FieldSpec::new(name, name, column_id, FieldKind::Text);
    let number =
        |name: &str, column_id: &str| FieldSpec::new(name, name, column_id, FieldKind::Number);

    FieldMapping {
        domain: Domain::Materials.as_str().to_string(),
        source_view: MATERIALS_VIEW.to_string(),
        key_column: "material_code".to_string(),
        key_source: KeySource::ItemName,
        item_name_column: "material_code".to_string(),
        fields: vec![
            text("material_name", "text_mkpvpe8r"),
            text("standard_description", "text_mkqyt4a5"),
            text("material_group", "text_mkpv3d2x"),
            text("external_material_group", "text_mkpvst42"),
            FieldSpec::new(
                "base_unit",
                "base_unit",
                "color_mkpvaacs",
                FieldKind::Status(StatusOptions::new(&[("KG", 1), ("ADT", 2), ("M", 5)])),
            ),
            number("net_weight", "numeric_mkpv4yay"),
            number("gross_weight", "numeric_mkpvc027"),
            FieldSpec::new(
                "last_invoice_date",
                "last_invoice_date",
                "date_mkpvwj4m",
                FieldKind::Date,
            )
            .clear_on_null(),
            text("last_invoice_no", "text_mkqy4v4n"),
            deletion_flag("color_mkqywq0b"),
        ],
    }
}

/// Customer master board: the code lives in its own column, the item
/// name is the customer name.
pub fn customers() -> FieldMapping {
    let text = |name: &str, column_id: &str| FieldSpec::new(name, name, column_id, FieldKind::Text);

    let sectors = StatusOptions::new(&[
        ("BEYAZ EŞYA", 0),
        ("ENDÜSTRIYEL", 1),
        ("SAVUNMA", 2),
        ("OTOMOTIV", 3),
        ("ENERJI", 4),
        ("", 5),
        ("YAPI", 6),
        ("ALTYAPI", 7),
        ("ULAŞIM", 8),
        ("Sector", 9),
        ("SBIB", 10),
        ("BEYAZESYA", 11),
        ("ENDS", 12),
        ("HAMUR", 13),
        ("HURDA", 14),
    ]);

    let sales_orgs = StatusOptions::new(&[
        ("Üzerinde çalışılıyor", 0),
        ("Bitir", 1),
        ("Takılmış", 2),
        ("1000", 3),
        ("4000", 4),
        ("", 5),
        ("2000", 6),
        ("Sales Organization", 7),
        ("3000", 8),
        ("6000", 9),
        ("5000", 10),
    ]);

    let channels = StatusOptions::new(&[
        ("Üzerinde çalışılıyor", 0),
        ("Bitir", 1),
        ("Takılmış", 2),
        ("10", 3),
        ("20", 4),
        ("", 5),
        ("Distribution Channel", 6),
        ("30", 7),
        ("Dist. Channel", 8),
    ]);

    FieldMapping {
        domain: Domain::Customers.as_str().to_string(),
        source_view: CUSTOMERS_VIEW.to_string(),
        key_column: "customer_code".to_string(),
        key_source: KeySource::Column("metin4".to_string()),
        item_name_column: "customer_name".to_string(),
        fields: vec![
            text("customer_name", "metin3"),
            text("customer_code", "metin4"),
            text("city", "metin17"),
            text("country_code", "metin1"),
            text("country_name", "dup__of_metin"),
            FieldSpec::new("sector", "sector", "durum1", FieldKind::Status(sectors)),
            FieldSpec::new(
                "distribution_channel",
                "distribution_channel",
                "durum2",
                FieldKind::Status(channels),
            ),
            FieldSpec::new("sales_org", "sales_org", "durum", FieldKind::Status(sales_orgs)),
            deletion_flag("color_mkt2p04q"),
        ],
    }
}

//! Persisted document format and its upgrade chain.
//!
//! Documents written by this crate are an envelope
//! `{"schemaVersion": 3, "months": {"YYYY-MM": record}}`. Older stores are a
//! bare month mapping (treated as v1) whose records may still carry the
//! legacy `rent`, `fixedCharges` and `variableCharges` fields. Every stored
//! version is upgraded one step at a time (`v1 -> v2 -> v3`); each step is a
//! total function over loosely-typed JSON so that legacy input never fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::line_item::{coerce_amount, LineItem};
use super::month::MonthKey;
use super::record::{ensure_mandatory_rent_rows, BudgetRecord};
use super::store::BudgetStore;
use crate::core::errors::{BudgetError, Result};

pub const CURRENT_SCHEMA_VERSION: u32 = 3;

/// v1: unversioned records with split charge tables and `rent`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthV1 {
    pub salary: Value,
    pub rent: Value,
    pub rent_bill_total: Value,
    pub charges: Vec<Value>,
    pub fixed_charges: Vec<Value>,
    pub variable_charges: Vec<Value>,
    pub rent_details: Vec<Value>,
}

/// v2: unified charges and `rentBillTotal`, items still loosely typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthV2 {
    pub salary: Value,
    pub rent_bill_total: Value,
    pub charges: Vec<Value>,
    pub rent_details: Vec<Value>,
}

/// A stored month mapping, tagged by the schema it was written with.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredMonths {
    V1(BTreeMap<String, MonthV1>),
    V2(BTreeMap<String, MonthV2>),
    V3(BTreeMap<MonthKey, BudgetRecord>),
}

/// Outcome of decoding a persisted document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub store: BudgetStore,
    /// Version the document was written with.
    pub schema_version: u32,
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    schema_version: u32,
    months: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    schema_version: u32,
    months: &'a BTreeMap<MonthKey, BudgetRecord>,
}

fn array_field(value: &Value, name: &str) -> Vec<Value> {
    value
        .get(name)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn scalar_field(value: &Value, name: &str) -> Value {
    value.get(name).cloned().unwrap_or(Value::Null)
}

impl MonthV1 {
    /// Reads the fields this schema knows about; anything else is dropped and
    /// a non-object entry yields an empty month.
    pub fn from_json(value: &Value) -> Self {
        Self {
            salary: scalar_field(value, "salary"),
            rent: scalar_field(value, "rent"),
            rent_bill_total: scalar_field(value, "rentBillTotal"),
            charges: array_field(value, "charges"),
            fixed_charges: array_field(value, "fixedCharges"),
            variable_charges: array_field(value, "variableCharges"),
            rent_details: array_field(value, "rentDetails"),
        }
    }

    /// The bill total falls back to `rent`; the three charge tables are
    /// concatenated as charges, fixed, variable.
    pub fn upgrade(self) -> MonthV2 {
        let rent_bill_total = if self.rent_bill_total.is_null() {
            self.rent
        } else {
            self.rent_bill_total
        };
        let mut charges = self.charges;
        charges.extend(self.fixed_charges);
        charges.extend(self.variable_charges);
        MonthV2 {
            salary: self.salary,
            rent_bill_total,
            charges,
            rent_details: self.rent_details,
        }
    }
}

impl MonthV2 {
    pub fn from_json(value: &Value) -> Self {
        Self {
            salary: scalar_field(value, "salary"),
            rent_bill_total: scalar_field(value, "rentBillTotal"),
            charges: array_field(value, "charges"),
            rent_details: array_field(value, "rentDetails"),
        }
    }

    /// Coerces every value and enforces the mandatory rent rows.
    pub fn upgrade(self) -> BudgetRecord {
        let rent_details = self.rent_details.iter().map(LineItem::from_json).collect();
        BudgetRecord {
            salary: coerce_amount(&self.salary),
            rent_bill_total: coerce_amount(&self.rent_bill_total),
            rent_details: ensure_mandatory_rent_rows(rent_details),
            charges: self.charges.iter().map(LineItem::from_json).collect(),
        }
    }
}

impl StoredMonths {
    pub fn version(&self) -> u32 {
        match self {
            StoredMonths::V1(_) => 1,
            StoredMonths::V2(_) => 2,
            StoredMonths::V3(_) => CURRENT_SCHEMA_VERSION,
        }
    }

    /// Parses a persisted document into its tagged form.
    pub fn parse(raw: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(raw)?;
        let Value::Object(ref map) = document else {
            return Err(BudgetError::StorageError(
                "persisted budget state is not a JSON object".into(),
            ));
        };

        if !map.contains_key("schemaVersion") {
            return Ok(StoredMonths::V1(
                map.iter()
                    .map(|(key, value)| (key.clone(), MonthV1::from_json(value)))
                    .collect(),
            ));
        }

        let envelope: Envelope = serde_json::from_value(document)?;
        let months = match envelope.months {
            Value::Object(months) => months,
            Value::Null => Default::default(),
            _ => {
                return Err(BudgetError::StorageError(
                    "`months` must be a JSON object".into(),
                ))
            }
        };
        match envelope.schema_version {
            1 => Ok(StoredMonths::V1(
                months
                    .iter()
                    .map(|(key, value)| (key.clone(), MonthV1::from_json(value)))
                    .collect(),
            )),
            2 => Ok(StoredMonths::V2(
                months
                    .iter()
                    .map(|(key, value)| (key.clone(), MonthV2::from_json(value)))
                    .collect(),
            )),
            CURRENT_SCHEMA_VERSION => Ok(StoredMonths::V3(serde_json::from_value(
                Value::Object(months),
            )?)),
            found => Err(BudgetError::UnsupportedSchema {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            }),
        }
    }

    /// Runs the upgrade chain up to the current schema.
    pub fn upgrade(self) -> LoadReport {
        let schema_version = self.version();
        let mut migrations = Vec::new();
        let mut warnings = Vec::new();

        let v2: BTreeMap<String, MonthV2> = match self {
            StoredMonths::V1(months) => months
                .into_iter()
                .map(|(key, month)| (key, month.upgrade()))
                .collect(),
            StoredMonths::V2(months) => months,
            StoredMonths::V3(mut months) => {
                for record in months.values_mut() {
                    record.normalize();
                }
                return LoadReport {
                    store: BudgetStore::from_months(months),
                    schema_version,
                    migrations,
                    warnings,
                };
            }
        };

        let mut current = BTreeMap::new();
        for (key, month) in v2 {
            match key.parse::<MonthKey>() {
                Ok(month_key) => {
                    current.insert(month_key, month.upgrade());
                    migrations.push(format!(
                        "{month_key}: upgraded schema v{schema_version} -> v{CURRENT_SCHEMA_VERSION}"
                    ));
                }
                Err(_) => warnings.push(format!(
                    "skipped entry `{key}`: not a YYYY-MM month key"
                )),
            }
        }

        LoadReport {
            store: BudgetStore::from_months(current),
            schema_version,
            migrations,
            warnings,
        }
    }
}

/// Decodes and upgrades a persisted document.
pub fn decode(raw: &str) -> Result<LoadReport> {
    Ok(StoredMonths::parse(raw)?.upgrade())
}

/// Serializes the whole store in the current schema.
pub fn encode(store: &BudgetStore) -> Result<String> {
    let envelope = EnvelopeRef {
        schema_version: CURRENT_SCHEMA_VERSION,
        months: store.months(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::record::{LOYER_LABEL, PROVISION_LABEL};
    use serde_json::json;

    fn key(raw: &str) -> MonthKey {
        raw.parse().unwrap()
    }

    #[test]
    fn legacy_rent_and_variable_charges_migrate() {
        let raw = json!({
            "2023-11": {
                "salary": 1900,
                "rent": 500,
                "variableCharges": [{"label": "Internet", "amount": 40}]
            }
        })
        .to_string();

        let report = decode(&raw).expect("legacy document decodes");
        assert_eq!(report.schema_version, 1);
        assert_eq!(report.migrations.len(), 1);
        let record = report.store.get(key("2023-11")).expect("month present");
        assert_eq!(record.salary, 1900.0);
        assert_eq!(record.rent_bill_total, 500.0);
        assert!(record.charges.contains(&LineItem::new("Internet", 40.0)));
        assert_eq!(record.rent_details[0].label, LOYER_LABEL);
        assert_eq!(record.rent_details[1].label, PROVISION_LABEL);
    }

    #[test]
    fn charge_tables_concatenate_in_fixed_order() {
        let month = MonthV1::from_json(&json!({
            "variableCharges": [{"label": "Food", "amount": 300}],
            "fixedCharges": [{"label": "Phone", "amount": 15}],
            "charges": [{"label": "Gym", "amount": 25}]
        }));
        let record = month.upgrade().upgrade();
        let labels: Vec<_> = record.charges.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Gym", "Phone", "Food"]);
    }

    #[test]
    fn bill_total_wins_over_legacy_rent() {
        let month = MonthV1::from_json(&json!({"rent": 500, "rentBillTotal": 800}));
        assert_eq!(month.upgrade().upgrade().rent_bill_total, 800.0);
        let month = MonthV1::from_json(&json!({"rent": 500, "rentBillTotal": null}));
        assert_eq!(month.upgrade().upgrade().rent_bill_total, 500.0);
    }

    #[test]
    fn unknown_fields_and_garbage_entries_are_tolerated() {
        let raw = json!({
            "2024-01": {"salary": "abc", "notes": "dropped", "charges": "not-a-list"},
            "2024-02": 42,
            "January": {"salary": 10}
        })
        .to_string();
        let report = decode(&raw).unwrap();
        assert_eq!(report.store.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        let january = report.store.get(key("2024-01")).unwrap();
        assert_eq!(january.salary, 0.0);
        assert!(january.charges.is_empty());
        assert_eq!(report.store.get(key("2024-02")), Some(&BudgetRecord::new()));
    }

    #[test]
    fn current_document_roundtrips_without_migrations() {
        let mut store = BudgetStore::new();
        let mut record = BudgetRecord::new();
        record.salary = 2000.0;
        record.charges.push(LineItem::new("Internet", 30.0));
        store.insert(key("2024-05"), record);

        let encoded = encode(&store).unwrap();
        assert!(encoded.contains("\"schemaVersion\": 3"));
        assert!(encoded.contains("\"rentBillTotal\""));
        let report = decode(&encoded).unwrap();
        assert_eq!(report.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(report.migrations.is_empty());
        assert_eq!(report.store, store);
    }

    #[test]
    fn current_document_is_normalized_on_load() {
        let raw = json!({
            "schemaVersion": 3,
            "months": {
                "2024-05": {"salary": -5, "rentDetails": [{"label": "Cave", "amount": 10}]}
            }
        })
        .to_string();
        let report = decode(&raw).unwrap();
        let record = report.store.get(key("2024-05")).unwrap();
        assert_eq!(record.salary, 0.0);
        assert_eq!(record.rent_details.len(), 3);
        assert_eq!(record.rent_details[2].label, "Cave");
    }

    #[test]
    fn versioned_v2_document_upgrades() {
        let raw = json!({
            "schemaVersion": 2,
            "months": {"2024-02": {"rentBillTotal": 1000, "rent": 1, "charges": []}}
        })
        .to_string();
        let report = decode(&raw).unwrap();
        assert_eq!(report.schema_version, 2);
        assert_eq!(report.store.get(key("2024-02")).unwrap().rent_bill_total, 1000.0);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let raw = json!({"schemaVersion": 9, "months": {}}).to_string();
        let err = decode(&raw).expect_err("newer schema fails");
        assert!(matches!(
            err,
            BudgetError::UnsupportedSchema { found: 9, supported: 3 }
        ));
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(decode("{ truncated").is_err());
        assert!(decode("[1, 2]").is_err());
        assert!(decode(r#"{"schemaVersion": 3, "months": {"2024-5": {}}}"#).is_err());
    }
}

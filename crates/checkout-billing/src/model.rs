//! Billing Models
//!
//! Wire models for the billing service (camelCase JSON). Monetary
//! amounts are `Decimal`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Plugin identifier for the bank-transfer payment plugin
pub const BANK_TRANSFER_PLUGIN: &str = "banktransfer-plugin";

/// Account creation request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub currency: String,

    /// External key correlating the account with the payment-network
    /// customer; omitted when correlation is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_key: Option<String>,
}

/// A billing account
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub currency: String,
    #[serde(default)]
    pub external_key: Option<String>,
}

/// Payment method creation request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentMethod {
    pub account_id: String,
    pub plugin_name: String,

    /// Plugin-specific properties; for the bank-transfer plugin these
    /// are `fundingSource` and `customerId`
    pub plugin_info: BTreeMap<String, String>,
}

impl NewPaymentMethod {
    /// Bank-transfer payment method backed by a linked funding source
    pub fn bank_transfer(
        account_id: impl Into<String>,
        funding_source: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        let mut plugin_info = BTreeMap::new();
        plugin_info.insert("fundingSource".to_string(), funding_source.into());
        plugin_info.insert("customerId".to_string(), customer_id.into());

        Self {
            account_id: account_id.into(),
            plugin_name: BANK_TRANSFER_PLUGIN.into(),
            plugin_info,
        }
    }
}

/// Subscription phases that can carry a price override
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhaseType {
    Trial,
    Discount,
    Fixedterm,
    Evergreen,
}

/// Price override pinning one phase to a fixed price
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasePriceOverride {
    pub phase_type: PhaseType,
    pub fixed_price: Decimal,
}

/// Subscription creation request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub account_id: String,
    pub product_name: String,
    pub product_category: String,
    pub billing_period: String,
    pub price_list: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_overrides: Vec<PhasePriceOverride>,
}

/// A created subscription
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: String,
    pub account_id: String,
    pub product_name: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// An invoice line item
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default)]
    pub subscription_id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub phase_name: Option<String>,
}

/// An invoice with its line items
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn subscription_request_serializes_overrides() {
        let new = NewSubscription {
            account_id: "a1".into(),
            product_name: "Sports".into(),
            product_category: "BASE".into(),
            billing_period: "MONTHLY".into(),
            price_list: "DEFAULT".into(),
            price_overrides: vec![PhasePriceOverride {
                phase_type: PhaseType::Trial,
                fixed_price: dec!(10.0),
            }],
        };

        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["accountId"], "a1");
        assert_eq!(value["priceOverrides"][0]["phaseType"], "TRIAL");
        assert_eq!(value["priceOverrides"][0]["fixedPrice"], 10.0);
    }

    #[test]
    fn bank_transfer_payment_method_carries_plugin_info() {
        let pm = NewPaymentMethod::bank_transfer("a1", "FS1", "CUST1");

        assert_eq!(pm.plugin_name, BANK_TRANSFER_PLUGIN);
        assert_eq!(pm.plugin_info["fundingSource"], "FS1");
        assert_eq!(pm.plugin_info["customerId"], "CUST1");
    }

    #[test]
    fn invoice_deserializes_items() {
        let invoice: Invoice = serde_json::from_str(
            r#"{
                "invoiceId": "i1",
                "amount": 10.0,
                "currency": "USD",
                "items": [{
                    "subscriptionId": "s1",
                    "amount": 10.0,
                    "startDate": "2016-08-01"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(invoice.amount, dec!(10.0));
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].subscription_id.as_deref(), Some("s1"));
        assert_eq!(
            invoice.items[0].start_date,
            NaiveDate::from_ymd_opt(2016, 8, 1)
        );
    }

    #[test]
    fn account_without_external_key_omits_the_field() {
        let new = NewAccount {
            name: "John Doe".into(),
            currency: "USD".into(),
            external_key: None,
        };

        let value = serde_json::to_value(&new).unwrap();
        assert!(value.get("externalKey").is_none());
    }
}

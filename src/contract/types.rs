//! Pipeline input types and the validation boundary for trigger payloads.
//!
//! Trigger payloads arrive loosely typed from the checkout and admin forms.
//! `DispatchRequest` mirrors that JSON shape with every field optional;
//! `DispatchRequest::validate` turns it into a `DispatchInput` before anything
//! reaches the renderer.

use serde::{Deserialize, Serialize};

use super::ContractError;
use crate::models::{CustomerType, PaymentMethod};

/// Client IP recorded when the request did not carry one.
pub const UNKNOWN_CLIENT_IP: &str = "127.0.0.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub tc_no: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub customer_type: CustomerType,
    pub company_name: Option<String>,
    pub tax_no: Option<String>,
    pub tax_office: Option<String>,
}

impl CustomerData {
    /// "name surname", or just the name when the surname is empty.
    pub fn full_name(&self) -> String {
        [self.name.trim(), self.surname.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageData {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
}

impl PackageData {
    /// Discount amount when the original price is above the sale price.
    pub fn discount(&self) -> Option<f64> {
        self.original_price
            .filter(|original| *original > self.price)
            .map(|original| original - self.price)
    }
}

/// Everything the renderer needs for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInput {
    pub customer: CustomerData,
    pub package: PackageData,
    pub payment_method: PaymentMethod,
    pub client_ip: String,
}

/// Validated trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchInput {
    /// Fully specified payload. Without an order id nothing is persisted.
    Full {
        order_id: Option<String>,
        input: ContractInput,
    },
    /// Only the order id; data is hydrated from the order row.
    ByOrder { order_id: String },
}

/// Raw trigger payload, accepted in both the full and the `{ orderId }` shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub order_id: Option<String>,
    pub customer_data: Option<RawCustomerData>,
    pub package_data: Option<RawPackageData>,
    pub payment_method: Option<String>,
    #[serde(rename = "clientIP", alias = "clientIp")]
    pub client_ip: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCustomerData {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tc_no: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub customer_type: Option<String>,
    pub company_name: Option<String>,
    pub tax_no: Option<String>,
    pub tax_office: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackageData {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
}

impl DispatchRequest {
    /// Minimal `{ orderId }` request.
    pub fn for_order(order_id: &str) -> Self {
        Self {
            order_id: Some(order_id.to_string()),
            ..Self::default()
        }
    }

    pub fn validate(self) -> Result<DispatchInput, ContractError> {
        let order_id = non_empty(self.order_id);

        let (customer, package) = match (self.customer_data, self.package_data) {
            (Some(customer), Some(package)) => (customer, package),
            _ => {
                return match order_id {
                    Some(order_id) => Ok(DispatchInput::ByOrder { order_id }),
                    None => Err(ContractError::InvalidRequest(
                        "either orderId or customerData + packageData is required".into(),
                    )),
                }
            }
        };

        let email = non_empty(customer.email)
            .filter(|e| e.contains('@'))
            .ok_or_else(|| {
                ContractError::InvalidRequest("customerData.email is missing or invalid".into())
            })?;
        let price = package
            .price
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| {
                ContractError::InvalidRequest("packageData.price is missing or invalid".into())
            })?;

        let input = ContractInput {
            customer: CustomerData {
                name: non_empty(customer.name).unwrap_or_default(),
                surname: non_empty(customer.surname).unwrap_or_default(),
                email,
                phone: non_empty(customer.phone),
                tc_no: non_empty(customer.tc_no),
                address: non_empty(customer.address),
                city: non_empty(customer.city),
                postal_code: non_empty(customer.postal_code),
                customer_type: parse_customer_type(customer.customer_type.as_deref())?,
                company_name: non_empty(customer.company_name),
                tax_no: non_empty(customer.tax_no),
                tax_office: non_empty(customer.tax_office),
            },
            package: PackageData {
                name: non_empty(package.name).unwrap_or_default(),
                price,
                original_price: package.original_price.filter(|p| p.is_finite()),
            },
            payment_method: parse_payment_method(self.payment_method.as_deref())?,
            client_ip: non_empty(self.client_ip).unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string()),
        };

        Ok(DispatchInput::Full { order_id, input })
    }
}

/// Accepts the stored tags plus the spellings the web forms send.
pub fn parse_payment_method(raw: Option<&str>) -> Result<PaymentMethod, ContractError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(PaymentMethod::BankTransfer);
    };
    match raw.to_ascii_lowercase().replace('-', "_").as_str() {
        "bank_transfer" | "bank" | "transfer" | "havale" | "eft" => Ok(PaymentMethod::BankTransfer),
        "credit_card" | "card" | "kredi_karti" => Ok(PaymentMethod::CreditCard),
        _ => Err(ContractError::InvalidRequest(format!(
            "unknown paymentMethod: {raw}"
        ))),
    }
}

pub fn parse_customer_type(raw: Option<&str>) -> Result<CustomerType, ContractError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(CustomerType::Individual);
    };
    match raw.to_ascii_lowercase().as_str() {
        "individual" | "bireysel" => Ok(CustomerType::Individual),
        "company" | "corporate" | "kurumsal" => Ok(CustomerType::Company),
        _ => Err(ContractError::InvalidRequest(format!(
            "unknown customerType: {raw}"
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request_json() -> serde_json::Value {
        serde_json::json!({
            "orderId": "order-1",
            "customerData": {
                "name": "Ayşe",
                "surname": "Yılmaz",
                "email": "ayse@example.com",
                "phone": "+90 532 000 00 00",
                "tcNo": "12345678901",
                "address": "Bağdat Cad. No:10",
                "city": "İstanbul",
                "customerType": "individual"
            },
            "packageData": { "name": "Kardiyoloji Check-up", "price": 1250.0, "originalPrice": 1500.0 },
            "paymentMethod": "credit-card",
            "clientIP": "203.0.113.7"
        })
    }

    #[test]
    fn full_payload_validates() {
        let request: DispatchRequest = serde_json::from_value(full_request_json()).unwrap();
        let DispatchInput::Full { order_id, input } = request.validate().unwrap() else {
            panic!("expected full input");
        };
        assert_eq!(order_id.as_deref(), Some("order-1"));
        assert_eq!(input.customer.full_name(), "Ayşe Yılmaz");
        assert_eq!(input.customer.tc_no.as_deref(), Some("12345678901"));
        assert_eq!(input.payment_method, PaymentMethod::CreditCard);
        assert_eq!(input.client_ip, "203.0.113.7");
        assert_eq!(input.package.discount(), Some(250.0));
    }

    #[test]
    fn minimal_payload_becomes_by_order() {
        let request: DispatchRequest =
            serde_json::from_value(serde_json::json!({ "orderId": "order-9" })).unwrap();
        assert_eq!(
            request.validate().unwrap(),
            DispatchInput::ByOrder { order_id: "order-9".into() }
        );
    }

    #[test]
    fn partial_payload_with_order_id_is_hydrated() {
        let request: DispatchRequest = serde_json::from_value(serde_json::json!({
            "orderId": "order-2",
            "customerData": { "name": "Ali" }
        }))
        .unwrap();
        assert!(matches!(request.validate().unwrap(), DispatchInput::ByOrder { .. }));
    }

    #[test]
    fn empty_payload_rejected() {
        let err = DispatchRequest::default().validate().unwrap_err();
        assert!(matches!(err, ContractError::InvalidRequest(_)));
    }

    #[test]
    fn missing_email_rejected() {
        let mut json = full_request_json();
        json["customerData"]["email"] = serde_json::Value::Null;
        let request: DispatchRequest = serde_json::from_value(json).unwrap();
        assert!(matches!(request.validate(), Err(ContractError::InvalidRequest(_))));
    }

    #[test]
    fn negative_price_rejected() {
        let mut json = full_request_json();
        json["packageData"]["price"] = serde_json::json!(-5.0);
        let request: DispatchRequest = serde_json::from_value(json).unwrap();
        assert!(matches!(request.validate(), Err(ContractError::InvalidRequest(_))));
    }

    #[test]
    fn defaults_for_missing_ip_and_payment_method() {
        let mut json = full_request_json();
        json.as_object_mut().unwrap().remove("clientIP");
        json.as_object_mut().unwrap().remove("paymentMethod");
        let request: DispatchRequest = serde_json::from_value(json).unwrap();
        let DispatchInput::Full { input, .. } = request.validate().unwrap() else {
            panic!("expected full input");
        };
        assert_eq!(input.client_ip, UNKNOWN_CLIENT_IP);
        assert_eq!(input.payment_method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn payment_method_spellings() {
        assert_eq!(
            parse_payment_method(Some("bank-transfer")).unwrap(),
            PaymentMethod::BankTransfer
        );
        assert_eq!(parse_payment_method(Some("card")).unwrap(), PaymentMethod::CreditCard);
        assert!(parse_payment_method(Some("bitcoin")).is_err());
    }

    #[test]
    fn corporate_maps_to_company() {
        assert_eq!(parse_customer_type(Some("corporate")).unwrap(), CustomerType::Company);
        assert_eq!(parse_customer_type(None).unwrap(), CustomerType::Individual);
    }

    #[test]
    fn full_name_skips_empty_surname() {
        let request: DispatchRequest = serde_json::from_value(full_request_json()).unwrap();
        let DispatchInput::Full { mut input, .. } = request.validate().unwrap() else {
            panic!("expected full input");
        };
        input.customer.surname.clear();
        assert_eq!(input.customer.full_name(), "Ayşe");
    }
}

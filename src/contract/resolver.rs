//! Rebuilds renderer input from an order row for `{ orderId }` triggers.

use rusqlite::Connection;

use super::types::{ContractInput, CustomerData, PackageData, UNKNOWN_CLIENT_IP};
use super::ContractError;
use crate::db::get_order;
use crate::models::Order;

/// Soft-deleted orders still resolve.
pub fn resolve(conn: &Connection, order_id: &str) -> Result<ContractInput, ContractError> {
    let order = get_order(conn, order_id)?
        .ok_or_else(|| ContractError::OrderNotFound(order_id.to_string()))?;
    Ok(input_from_order(order))
}

pub fn input_from_order(order: Order) -> ContractInput {
    let (name, surname) = split_full_name(&order.customer_name);
    ContractInput {
        customer: CustomerData {
            name,
            surname,
            email: order.customer_email,
            phone: order.customer_phone,
            tc_no: order.customer_tc_no,
            address: order.customer_address,
            city: order.customer_city,
            postal_code: order.customer_postal_code,
            customer_type: order.customer_type,
            company_name: order.company_name,
            tax_no: order.tax_no,
            tax_office: order.tax_office,
        },
        package: PackageData {
            name: order.package_name,
            price: order.package_price,
            original_price: order.package_original_price,
        },
        payment_method: order.payment_method.unwrap_or_default(),
        client_ip: order
            .contract
            .client_ip
            .filter(|ip| !ip.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string()),
    }
}

/// First token is the name, the rest the surname.
pub fn split_full_name(full: &str) -> (String, String) {
    let full = full.trim();
    match full.split_once(' ') {
        Some((name, surname)) => (name.to_string(), surname.trim().to_string()),
        None => (full.to_string(), String::new()),
    }
}

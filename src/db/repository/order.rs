use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::DB_DATETIME_FORMAT;
use crate::db::DatabaseError;
use crate::models::*;

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, customer_tc_no,
     customer_address, customer_city, customer_postal_code, customer_type, company_name,
     tax_no, tax_office, package_name, package_price, package_original_price, package_type,
     payment_method, status, created_at, deleted_at, pre_info_document,
     distance_sales_document, contract_generated_at, contract_client_ip";

/// Inserts a new order with empty contract columns and returns its id.
pub fn insert_order(conn: &Connection, order: &NewOrder) -> Result<String, DatabaseError> {
    if order.customer_email.trim().is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "customer_email must not be empty".into(),
        ));
    }
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().naive_utc().format(DB_DATETIME_FORMAT).to_string();

    conn.execute(
        "INSERT INTO orders (id, customer_name, customer_email, customer_phone, customer_tc_no,
         customer_address, customer_city, customer_postal_code, customer_type, company_name,
         tax_no, tax_office, package_name, package_price, package_original_price, package_type,
         payment_method, status, created_at, contract_client_ip)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20)",
        params![
            id,
            order.customer_name,
            order.customer_email,
            order.customer_phone,
            order.customer_tc_no,
            order.customer_address,
            order.customer_city,
            order.customer_postal_code,
            order.customer_type.as_str(),
            order.company_name,
            order.tax_no,
            order.tax_office,
            order.package_name,
            order.package_price,
            order.package_original_price,
            order.package_type,
            order.payment_method.map(|m| m.as_str()),
            order.status.as_str(),
            created_at,
            order.client_ip,
        ],
    )?;
    Ok(id)
}

/// Loads an order by id, including soft-deleted rows.
pub fn get_order(conn: &Connection, id: &str) -> Result<Option<Order>, DatabaseError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id], |row| {
            Ok(OrderRow {
                id: row.get(0)?,
                customer_name: row.get(1)?,
                customer_email: row.get(2)?,
                customer_phone: row.get(3)?,
                customer_tc_no: row.get(4)?,
                customer_address: row.get(5)?,
                customer_city: row.get(6)?,
                customer_postal_code: row.get(7)?,
                customer_type: row.get(8)?,
                company_name: row.get(9)?,
                tax_no: row.get(10)?,
                tax_office: row.get(11)?,
                package_name: row.get(12)?,
                package_price: row.get(13)?,
                package_original_price: row.get(14)?,
                package_type: row.get(15)?,
                payment_method: row.get(16)?,
                status: row.get(17)?,
                created_at: row.get(18)?,
                deleted_at: row.get(19)?,
                pre_info_document: row.get(20)?,
                distance_sales_document: row.get(21)?,
                contract_generated_at: row.get(22)?,
                contract_client_ip: row.get(23)?,
            })
        })
        .optional()?;

    row.map(order_from_row).transpose()
}

/// Marks an order deleted without touching its contract documents.
pub fn soft_delete_order(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    let now = Utc::now().naive_utc().format(DB_DATETIME_FORMAT).to_string();
    let changed = conn.execute(
        "UPDATE orders SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        params![now, id],
    )?;
    if changed == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Clears the soft-delete marker.
pub fn restore_order(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE orders SET deleted_at = NULL WHERE id = ?1 AND deleted_at IS NOT NULL",
        params![id],
    )?;
    if changed == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

fn not_found(id: &str) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: "Order".into(),
        id: id.into(),
    }
}

struct OrderRow {
    id: String,
    customer_name: String,
    customer_email: String,
    customer_phone: Option<String>,
    customer_tc_no: Option<String>,
    customer_address: Option<String>,
    customer_city: Option<String>,
    customer_postal_code: Option<String>,
    customer_type: String,
    company_name: Option<String>,
    tax_no: Option<String>,
    tax_office: Option<String>,
    package_name: String,
    package_price: f64,
    package_original_price: Option<f64>,
    package_type: Option<String>,
    payment_method: Option<String>,
    status: String,
    created_at: String,
    deleted_at: Option<String>,
    pre_info_document: Option<String>,
    distance_sales_document: Option<String>,
    contract_generated_at: Option<String>,
    contract_client_ip: Option<String>,
}

fn order_from_row(row: OrderRow) -> Result<Order, DatabaseError> {
    Ok(Order {
        id: row.id,
        customer_name: row.customer_name,
        customer_email: row.customer_email,
        customer_phone: row.customer_phone,
        customer_tc_no: row.customer_tc_no,
        customer_address: row.customer_address,
        customer_city: row.customer_city,
        customer_postal_code: row.customer_postal_code,
        customer_type: CustomerType::from_str(&row.customer_type)?,
        company_name: row.company_name,
        tax_no: row.tax_no,
        tax_office: row.tax_office,
        package_name: row.package_name,
        package_price: row.package_price,
        package_original_price: row.package_original_price,
        package_type: row.package_type,
        payment_method: row
            .payment_method
            .as_deref()
            .map(PaymentMethod::from_str)
            .transpose()?,
        status: OrderStatus::from_str(&row.status)?,
        created_at: parse_datetime("created_at", &row.created_at)?,
        deleted_at: row
            .deleted_at
            .as_deref()
            .map(|d| parse_datetime("deleted_at", d))
            .transpose()?,
        contract: ContractColumns {
            pre_info_document: row.pre_info_document,
            distance_sales_document: row.distance_sales_document,
            generated_at: row.contract_generated_at,
            client_ip: row.contract_client_ip,
        },
    })
}

fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, DB_DATETIME_FORMAT).map_err(|_| {
        DatabaseError::InvalidEnum {
            field: field.into(),
            value: value.into(),
        }
    })
}

#[cfg(test)]
pub(crate) fn sample_new_order(full_name: &str) -> NewOrder {
    NewOrder {
        customer_name: full_name.into(),
        customer_email: "ayse@example.com".into(),
        customer_phone: Some("+90 532 000 00 00".into()),
        customer_tc_no: Some("12345678901".into()),
        customer_address: Some("Bağdat Cad. No:10".into()),
        customer_city: Some("İstanbul".into()),
        customer_postal_code: Some("34710".into()),
        customer_type: CustomerType::Individual,
        company_name: None,
        tax_no: None,
        tax_office: None,
        package_name: "Kardiyoloji Check-up".into(),
        package_price: 1250.0,
        package_original_price: Some(1500.0),
        package_type: Some("checkup".into()),
        payment_method: Some(PaymentMethod::CreditCard),
        status: OrderStatus::Completed,
        client_ip: Some("203.0.113.7".into()),
    }
}

//! Input validation for the public creation endpoints.
//!
//! Each validator either returns a cleaned, typed value ready to persist or
//! the first rule that failed. Nothing touches the database here.

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::error::ApiError;
use crate::models::order::{CreateOrderRequest, OrderItem, PaymentMethod};
use crate::models::rating::{SubmitRatingRequest, MAX_RATING, MIN_RATING};
use crate::models::reservation::CreateReservationRequest;

lazy_static! {
    // Bangladeshi mobile numbers: optional +880/880/0 prefix, operator digit 3-9
    static ref BD_PHONE_REGEX: Regex = Regex::new(r"^(\+880|880|0)?1[3-9]\d{8}$").unwrap();

    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    static ref PHONE_SEPARATORS: Regex = Regex::new(r"[\s\-()]").unwrap();
}

/// Maximum gap between the declared wallet payment and the order total
pub const PAYMENT_TOLERANCE: Decimal = dec!(0.01);

pub const MIN_TRANSACTION_ID_LEN: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Strip spaces, dashes and brackets the way customers type numbers.
pub fn normalize_phone(phone: &str) -> String {
    PHONE_SEPARATORS.replace_all(phone.trim(), "").into_owned()
}

pub fn is_valid_bd_phone(phone: &str) -> bool {
    BD_PHONE_REGEX.is_match(&normalize_phone(phone))
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletPayment {
    pub number: String,
    pub transaction_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub wallet: Option<WalletPayment>,
    pub notes: Option<String>,
}

pub fn validate_new_order(req: CreateOrderRequest) -> Result<NewOrder, ApiError> {
    let customer_name = required(req.customer_name);
    let customer_email = required(req.customer_email);
    let customer_phone = required(req.customer_phone);
    let delivery_address = required(req.delivery_address);
    let items = req.items.filter(|items| !items.is_empty());
    let total = req.total.filter(|t| !t.is_zero());

    let (
        Some(customer_name),
        Some(customer_email),
        Some(customer_phone),
        Some(delivery_address),
        Some(items),
        Some(total),
    ) = (
        customer_name,
        customer_email,
        customer_phone,
        delivery_address,
        items,
        total,
    )
    else {
        return Err(ApiError::validation("Missing required fields"));
    };

    if let Some(bad) = items
        .iter()
        .find(|i| i.name.trim().is_empty() || i.qty == 0 || i.price.is_sign_negative())
    {
        return Err(ApiError::validation(format!(
            "Invalid order item: {:?}",
            bad.name
        )));
    }

    let payment_method = match req.payment_method.as_deref().map(str::trim) {
        None | Some("") => PaymentMethod::Cash,
        Some(raw) => PaymentMethod::from_str(raw)
            .map_err(|_| ApiError::validation("Invalid payment method"))?,
    };

    let wallet = match payment_method {
        PaymentMethod::Cash => None,
        PaymentMethod::Bkash => Some(validate_wallet_payment(
            req.bkash_number.as_deref(),
            req.bkash_transaction_id.as_deref(),
            req.bkash_amount.as_ref().and_then(|a| a.to_decimal()),
            total,
        )?),
    };

    let subtotal = req
        .subtotal
        .unwrap_or_else(|| items.iter().map(OrderItem::line_total).sum());

    Ok(NewOrder {
        customer_name,
        customer_email,
        customer_phone,
        delivery_address,
        items,
        subtotal,
        tax: req.tax.unwrap_or(Decimal::ZERO),
        total,
        payment_method,
        wallet,
        notes: required(req.notes),
    })
}

fn validate_wallet_payment(
    number: Option<&str>,
    transaction_id: Option<&str>,
    amount: Option<Decimal>,
    total: Decimal,
) -> Result<WalletPayment, ApiError> {
    let number = number.map(normalize_phone).unwrap_or_default();
    if !BD_PHONE_REGEX.is_match(&number) {
        return Err(ApiError::validation("Invalid bKash number"));
    }

    let transaction_id = transaction_id.map(str::trim).unwrap_or_default();
    if transaction_id.chars().count() < MIN_TRANSACTION_ID_LEN {
        return Err(ApiError::validation(format!(
            "bKash transaction ID must be at least {} characters",
            MIN_TRANSACTION_ID_LEN
        )));
    }

    let amount = match amount {
        Some(a) if a > Decimal::ZERO => a,
        _ => return Err(ApiError::validation("Invalid bKash amount")),
    };

    if (amount - total).abs() > PAYMENT_TOLERANCE {
        return Err(ApiError::validation(format!(
            "bKash amount {} does not match order total {}",
            amount, total
        )));
    }

    Ok(WalletPayment {
        number,
        transaction_id: transaction_id.to_string(),
        amount,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub message: Option<String>,
}

/// Dates in the past are accepted; the form is the only place that
/// discourages them.
pub fn validate_new_reservation(req: CreateReservationRequest) -> Result<NewReservation, ApiError> {
    let (Some(name), Some(email), Some(phone), Some(date), Some(time), Some(guests)) = (
        required(req.customer_name),
        required(req.customer_email),
        required(req.customer_phone),
        required(req.date),
        required(req.time),
        req.guests,
    ) else {
        return Err(ApiError::validation("Missing required fields"));
    };

    let date = parse_reservation_date(&date)
        .ok_or_else(|| ApiError::validation(format!("Invalid date: {}", date)))?;

    let guests = guests
        .to_i32()
        .filter(|g| *g > 0)
        .ok_or_else(|| ApiError::validation("Guests must be a positive whole number"))?;

    Ok(NewReservation {
        name,
        email,
        phone,
        date,
        time,
        guests,
        message: required(req.special_requests),
    })
}

/// Accepts `2025-06-01` or a full RFC 3339 timestamp.
pub fn parse_reservation_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    pub order_id: String,
    pub rating: i32,
    pub feedback: Option<String>,
}

pub fn validate_rating(req: SubmitRatingRequest) -> Result<NewRating, ApiError> {
    let (Some(order_id), Some(rating)) = (required(req.order_id), req.rating) else {
        return Err(ApiError::validation("Order ID and rating are required"));
    };

    let rating = rating
        .to_i32()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(|| {
            ApiError::validation(format!(
                "Rating must be a whole number between {} and {}",
                MIN_RATING, MAX_RATING
            ))
        })?;

    Ok(NewRating {
        order_id,
        rating,
        feedback: required(req.feedback),
    })
}

/// Trimmed value, or `None` when absent or blank.
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::LooseNumber;

    fn cash_order() -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: Some("Karim".into()),
            customer_email: Some("karim@example.com".into()),
            customer_phone: Some("01812345678".into()),
            delivery_address: Some("Road 5, Nasirabad, Chattogram".into()),
            items: Some(vec![
                OrderItem {
                    id: Some("wings".into()),
                    name: "Chicken Wings".into(),
                    price: dec!(500),
                    qty: 2,
                },
                OrderItem {
                    id: Some("mushroom".into()),
                    name: "Spicy Mushroom".into(),
                    price: dec!(300),
                    qty: 1,
                },
            ]),
            subtotal: Some(dec!(1300)),
            tax: Some(dec!(65)),
            total: Some(dec!(1415)),
            payment_method: Some("cash".into()),
            ..Default::default()
        }
    }

    fn bkash_order(amount: &str) -> CreateOrderRequest {
        CreateOrderRequest {
            payment_method: Some("bkash".into()),
            bkash_number: Some("+880 1712-345678".into()),
            bkash_transaction_id: Some("8N7A6B5C4D".into()),
            bkash_amount: Some(LooseNumber::Text(amount.into())),
            ..cash_order()
        }
    }

    #[test]
    fn test_phone_patterns() {
        assert!(is_valid_bd_phone("01712345678"));
        assert!(is_valid_bd_phone("+8801712345678"));
        assert!(is_valid_bd_phone("880 1712-345678"));
        assert!(!is_valid_bd_phone("01212345678"));
        assert!(!is_valid_bd_phone("0171234567"));
        assert!(!is_valid_bd_phone("555-1234"));
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("guest@clubgrille.com"));
        assert!(!is_valid_email("guest@clubgrille"));
        assert!(!is_valid_email("guest clubgrille.com"));
    }

    #[test]
    fn test_cash_order_keeps_declared_amounts() {
        let order = validate_new_order(cash_order()).unwrap();
        assert_eq!(order.payment_method, PaymentMethod::Cash);
        assert_eq!(order.total, dec!(1415));
        assert_eq!(order.subtotal + order.tax + dec!(50), order.total);
        assert!(order.wallet.is_none());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut req = cash_order();
        req.customer_phone = Some("   ".into());
        let err = validate_new_order(req).unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");

        let mut req = cash_order();
        req.items = Some(vec![]);
        assert!(validate_new_order(req).is_err());

        let mut req = cash_order();
        req.total = None;
        assert!(validate_new_order(req).is_err());
    }

    #[test]
    fn test_zero_quantity_item_rejected() {
        let mut req = cash_order();
        if let Some(items) = req.items.as_mut() {
            items[0].qty = 0;
        }
        let err = validate_new_order(req).unwrap_err();
        assert!(err.to_string().starts_with("Invalid order item"));
    }

    #[test]
    fn test_unknown_payment_method_rejected() {
        let mut req = cash_order();
        req.payment_method = Some("card".into());
        assert_eq!(
            validate_new_order(req).unwrap_err().to_string(),
            "Invalid payment method"
        );
    }

    #[test]
    fn test_bkash_within_tolerance_accepted() {
        let order = validate_new_order(bkash_order("1415.01")).unwrap();
        let wallet = order.wallet.unwrap();
        assert_eq!(wallet.number, "+8801712345678");
        assert_eq!(wallet.amount, dec!(1415.01));
    }

    #[test]
    fn test_bkash_amount_mismatch_rejected() {
        let err = validate_new_order(bkash_order("1415.02")).unwrap_err();
        assert!(err.to_string().contains("does not match order total"));

        let err = validate_new_order(bkash_order("0")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid bKash amount");

        let err = validate_new_order(bkash_order("lots")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid bKash amount");
    }

    #[test]
    fn test_bkash_short_transaction_id_rejected() {
        let mut req = bkash_order("1415");
        req.bkash_transaction_id = Some("ABC123".into());
        let err = validate_new_order(req).unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn test_bkash_bad_number_checked_first() {
        let mut req = bkash_order("99");
        req.bkash_number = Some("12345".into());
        assert_eq!(
            validate_new_order(req).unwrap_err().to_string(),
            "Invalid bKash number"
        );
    }

    #[test]
    fn test_reservation_validation() {
        let req = CreateReservationRequest {
            customer_name: Some("Nadia".into()),
            customer_email: Some("nadia@example.com".into()),
            customer_phone: Some("01911111111".into()),
            date: Some("2020-01-15".into()),
            time: Some("8:00 PM".into()),
            guests: Some(LooseNumber::Text("4".into())),
            special_requests: Some("".into()),
        };

        let reservation = validate_new_reservation(req.clone()).unwrap();
        assert_eq!(reservation.guests, 4);
        assert_eq!(reservation.date, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
        assert!(reservation.message.is_none());

        let zero_guests = CreateReservationRequest {
            guests: Some(LooseNumber::Number(dec!(0))),
            ..req.clone()
        };
        assert!(validate_new_reservation(zero_guests).is_err());

        let bad_date = CreateReservationRequest {
            date: Some("next friday".into()),
            ..req
        };
        assert!(validate_new_reservation(bad_date).is_err());
    }

    #[test]
    fn test_reservation_date_accepts_timestamp() {
        assert_eq!(
            parse_reservation_date("2025-12-31T18:30:00.000Z"),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
    }

    #[test]
    fn test_rating_bounds() {
        let ok = validate_rating(SubmitRatingRequest {
            order_id: Some("order-1".into()),
            rating: Some(LooseNumber::Text("5".into())),
            feedback: Some("Great ribs".into()),
        })
        .unwrap();
        assert_eq!(ok.rating, 5);

        for bad in ["0", "6", "3.5"] {
            let result = validate_rating(SubmitRatingRequest {
                order_id: Some("order-1".into()),
                rating: Some(LooseNumber::Text(bad.into())),
                feedback: None,
            });
            assert!(result.is_err(), "rating {bad} should be rejected");
        }

        let missing = validate_rating(SubmitRatingRequest::default()).unwrap_err();
        assert_eq!(missing.to_string(), "Order ID and rating are required");
    }
}

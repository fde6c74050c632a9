//! Field-level validation of the customer-facing forms.
//!
//! These run before submission and report every failing field at once,
//! keyed by field name. The server repeats the checks it depends on in
//! `services::validation`; the stricter rules here (name and address length,
//! email and phone formats, no past dates) are form-only.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::common::LooseNumber;
use crate::models::order::{CreateOrderRequest, PaymentMethod};
use crate::models::reservation::CreateReservationRequest;
use crate::services::validation::{
    is_valid_bd_phone, is_valid_email, normalize_phone, parse_reservation_date,
    MIN_TRANSACTION_ID_LEN,
};
use crate::storefront::cart::Cart;

pub type FieldErrors = BTreeMap<&'static str, String>;

const MIN_NAME_LEN: usize = 2;
const MIN_ADDRESS_LEN: usize = 10;
const MAX_ADDRESS_LEN: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
    pub payment_method: Option<PaymentMethod>,
    pub bkash_number: String,
    pub bkash_transaction_id: String,
    pub bkash_amount: String,
}

impl CheckoutForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert("name", "Full name is required".into());
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.insert("name", "Name must be at least 2 characters".into());
        }

        check_email(&self.email, &mut errors);
        check_phone(&self.phone, &mut errors);

        let address_len = self.address.trim().chars().count();
        if address_len == 0 {
            errors.insert("address", "Delivery address is required".into());
        } else if address_len < MIN_ADDRESS_LEN {
            errors.insert("address", "Address must be at least 10 characters".into());
        } else if address_len > MAX_ADDRESS_LEN {
            errors.insert("address", "Address must be less than 200 characters".into());
        }

        if self.payment_method == Some(PaymentMethod::Bkash) {
            if !is_valid_bd_phone(&self.bkash_number) {
                errors.insert("bkashNumber", "Please enter a valid bKash number".into());
            }
            if self.bkash_transaction_id.trim().chars().count() < MIN_TRANSACTION_ID_LEN {
                errors.insert(
                    "bkashTransactionId",
                    "Transaction ID must be at least 8 characters".into(),
                );
            }
            let amount_ok = LooseNumber::Text(self.bkash_amount.clone())
                .to_decimal()
                .is_some_and(|a| a > Decimal::ZERO);
            if !amount_ok {
                errors.insert("bkashAmount", "Please enter the amount you paid".into());
            }
        }

        errors
    }

    /// Build the checkout submission from the form and the cart's pricing.
    pub fn to_order_request(&self, cart: &Cart) -> CreateOrderRequest {
        let summary = cart.checkout_summary();
        let method = self.payment_method.unwrap_or(PaymentMethod::Cash);
        let wallet = method == PaymentMethod::Bkash;

        CreateOrderRequest {
            customer_name: Some(self.name.trim().to_string()),
            customer_email: Some(self.email.trim().to_string()),
            customer_phone: Some(normalize_phone(&self.phone)),
            delivery_address: Some(self.address.trim().to_string()),
            items: Some(cart.order_items()),
            subtotal: Some(summary.subtotal),
            tax: Some(summary.tax),
            total: Some(summary.total),
            payment_method: Some(method.to_string()),
            notes: Some(self.notes.trim().to_string()).filter(|n| !n.is_empty()),
            bkash_number: wallet.then(|| normalize_phone(&self.bkash_number)),
            bkash_transaction_id: wallet.then(|| self.bkash_transaction_id.trim().to_string()),
            bkash_amount: wallet.then(|| LooseNumber::Text(self.bkash_amount.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReservationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub special_requests: String,
}

impl ReservationForm {
    /// The date picker's minimum is `today`.
    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required".into());
        }
        check_email(&self.email, &mut errors);
        check_phone(&self.phone, &mut errors);

        match parse_reservation_date(self.date.trim()) {
            None => {
                errors.insert("date", "Please pick a date".into());
            }
            Some(date) if date < today => {
                errors.insert("date", "Date cannot be in the past".into());
            }
            Some(_) => {}
        }

        if self.time.trim().is_empty() {
            errors.insert("time", "Please pick a time".into());
        }
        if self.guests == 0 {
            errors.insert("guests", "At least one guest is required".into());
        }

        errors
    }

    pub fn to_request(&self) -> CreateReservationRequest {
        CreateReservationRequest {
            customer_name: Some(self.name.trim().to_string()),
            customer_email: Some(self.email.trim().to_string()),
            customer_phone: Some(normalize_phone(&self.phone)),
            date: Some(self.date.trim().to_string()),
            time: Some(self.time.trim().to_string()),
            guests: Some(LooseNumber::Number(Decimal::from(self.guests))),
            special_requests: Some(self.special_requests.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required".into());
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address".into());
    }
}

fn check_phone(phone: &str, errors: &mut FieldErrors) {
    if phone.trim().is_empty() {
        errors.insert("phone", "Phone number is required".into());
    } else if !is_valid_bd_phone(phone) {
        errors.insert(
            "phone",
            "Please enter a valid Bangladeshi phone number (e.g., +880 1XXX-XXXXXXXX)".into(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::validate_new_order;
    use rust_decimal_macros::dec;

    fn filled_checkout() -> CheckoutForm {
        CheckoutForm {
            name: "Sadia Islam".into(),
            email: "sadia@example.com".into(),
            phone: "+880 1812-345678".into(),
            address: "House 12, Road 3, Khulshi, Chattogram".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_checkout_has_no_errors() {
        assert!(filled_checkout().validate().is_empty());
    }

    #[test]
    fn test_checkout_reports_every_bad_field() {
        let form = CheckoutForm {
            name: "S".into(),
            email: "sadia@".into(),
            phone: "12345".into(),
            address: "short".into(),
            ..Default::default()
        };

        let errors = form.validate();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec!["address", "email", "name", "phone"]
        );
    }

    #[test]
    fn test_bkash_fields_checked_only_for_wallet() {
        let mut form = filled_checkout();
        form.payment_method = Some(PaymentMethod::Bkash);

        let errors = form.validate();
        assert!(errors.contains_key("bkashNumber"));
        assert!(errors.contains_key("bkashTransactionId"));
        assert!(errors.contains_key("bkashAmount"));
    }

    #[test]
    fn test_checkout_request_passes_server_validation() {
        let mut cart = Cart::default();
        cart.add_item("a", "Item A", dec!(500), 2);
        cart.add_item("b", "Item B", dec!(300), 1);

        let mut form = filled_checkout();
        form.payment_method = Some(PaymentMethod::Bkash);
        form.bkash_number = "01812345678".into();
        form.bkash_transaction_id = "9XK2LM7QPA".into();
        form.bkash_amount = "1415".into();
        assert!(form.validate().is_empty());

        let order = validate_new_order(form.to_order_request(&cart)).unwrap();
        assert_eq!(order.total, dec!(1415));
        assert_eq!(order.customer_phone, "+8801812345678");
        assert!(order.wallet.is_some());
    }

    #[test]
    fn test_reservation_form_rejects_past_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut form = ReservationForm {
            name: "Imran".into(),
            email: "imran@example.com".into(),
            phone: "01512345678".into(),
            date: "2025-05-31".into(),
            time: "7:00 PM".into(),
            guests: 2,
            special_requests: String::new(),
        };

        let errors = form.validate(today);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("date"));

        form.date = "2025-06-01".into();
        assert!(form.validate(today).is_empty());

        let request = form.to_request();
        assert!(request.special_requests.is_none());
        assert_eq!(request.guests.and_then(|g| g.to_i32()), Some(2));
    }
}

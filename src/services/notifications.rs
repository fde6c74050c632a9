//! Customer notifications.
//!
//! Rendering is pure (`render_*` builds an [`EmailMessage`]); [`Notifier`]
//! hands the message to the configured [`EmailSender`] once and turns the
//! outcome into a [`DeliveryReport`]. A failed send is logged and dropped.

use chrono::Datelike;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::entities::reservations;
use crate::models::order::OrderResponse;
use crate::services::email::{DeliveryReport, EmailMessage, EmailSender};

const RESTAURANT_NAME: &str = "Club Grille";
const CONTACT_PHONE: &str = "+880 1234-567890";
const CONTACT_EMAIL: &str = "info@clubgrille.com";
const CONTACT_ADDRESS: &str = "Rahim's Plaza de CPDL, Chattogram, Bangladesh";
const OPENING_HOURS: &str = "Mon–Thu: 12PM – 11PM | Fri–Sun: 12PM – 12AM";

#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    public_base_url: String,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>, public_base_url: impl Into<String>) -> Self {
        Self {
            sender,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn rating_url(&self, order_id: &str) -> String {
        format!("{}/rate-order/{}", self.public_base_url, order_id)
    }

    pub async fn order_confirmation(&self, order: &OrderResponse) -> DeliveryReport {
        self.dispatch("order confirmation", render_order_confirmation(order))
            .await
    }

    pub async fn order_completion(&self, order: &OrderResponse) -> DeliveryReport {
        let message = render_order_completion(order, &self.rating_url(&order.id), &self.public_base_url);
        self.dispatch("order completion", message).await
    }

    pub async fn reservation_approved(&self, reservation: &reservations::Model) -> DeliveryReport {
        self.dispatch("reservation approved", render_reservation_approved(reservation))
            .await
    }

    pub async fn reservation_rejected(&self, reservation: &reservations::Model) -> DeliveryReport {
        self.dispatch("reservation rejected", render_reservation_rejected(reservation))
            .await
    }

    async fn dispatch(&self, kind: &str, message: EmailMessage) -> DeliveryReport {
        let recipient = message.to.clone();

        match self.sender.send(message).await {
            Ok(()) => {
                tracing::info!("Sent {} email to {}", kind, recipient);
                DeliveryReport::delivered()
            }
            Err(e) => {
                tracing::warn!("Failed to send {} email to {}: {}", kind, recipient, e);
                DeliveryReport::failed(&e)
            }
        }
    }
}

pub fn render_order_confirmation(order: &OrderResponse) -> EmailMessage {
    let items: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                r#"<tr><td>{}<br><small>Quantity: {}</small></td><td align="right">BDT {}</td></tr>"#,
                escape_html(&item.name),
                item.qty,
                money(item.price)
            )
        })
        .collect();

    let payment = if order.payment_method == "bkash" {
        format!(
            r#"<div class="bkash-box">
  <h3>bKash Payment Details</h3>
  <p><strong>Customer bKash Number:</strong> {}</p>
  <p><strong>Transaction ID:</strong> {}</p>
  <p><strong>Amount Paid:</strong> BDT {}</p>
  <p>Your payment has been received and is being verified.</p>
</div>"#,
            escape_html(order.bkash_number.as_deref().unwrap_or("N/A")),
            escape_html(order.bkash_transaction_id.as_deref().unwrap_or("N/A")),
            money(order.bkash_amount.unwrap_or(Decimal::ZERO))
        )
    } else {
        format!(
            r#"<div class="payment-box">
  <h3>Payment Method</h3>
  <p><strong>Cash on Delivery</strong><br>Please keep exact change ready: BDT {}</p>
</div>"#,
            money(order.total)
        )
    };

    let body = format!(
        r#"<h2>Your Order is Being Prepared!</h2>
<p>Dear {name},</p>
<p>Thank you for placing your order with <strong>{restaurant}</strong>! We're excited to prepare your meal.</p>
<table class="order-box" width="100%">
  {items}
  <tr><td><strong>Total:</strong></td><td align="right"><strong>BDT {total}</strong></td></tr>
</table>
{payment}
<p><strong>Estimated preparation time:</strong> 20–30 minutes</p>
<p><strong>Delivery Address:</strong><br>{address}</p>"#,
        name = escape_html(&order.customer_name),
        restaurant = RESTAURANT_NAME,
        items = items,
        total = money(order.total),
        payment = payment,
        address = escape_html(&order.delivery_address),
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: format!("Order Confirmed! - {}", RESTAURANT_NAME),
        html: wrap_layout(&body),
    }
}

pub fn render_order_completion(order: &OrderResponse, rating_url: &str, home_url: &str) -> EmailMessage {
    let items: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                r#"<tr><td>{}<br><small>Quantity: {}</small></td><td align="right">BDT {}</td></tr>"#,
                escape_html(&item.name),
                item.qty,
                money(item.line_total())
            )
        })
        .collect();

    let stars: String = (1..=5)
        .rev()
        .map(|score| format!(r#"<a href="{rating_url}?rating={score}" class="star-link">★</a>"#))
        .collect();

    let body = format!(
        r#"<h2>Thank You, {name}!</h2>
<p>Your order has been successfully completed and delivered. We hope you enjoyed your meal from <strong>{restaurant}</strong>!</p>
<table class="order-box" width="100%">
  {items}
  <tr><td><strong>Total:</strong></td><td align="right"><strong>BDT {total}</strong></td></tr>
</table>
<div class="rating-box">
  <h3>How was your experience?</h3>
  <p>Rate your order with one click:</p>
  <p>{stars}</p>
  <p><a href="{rating_url}">Leave feedback</a></p>
</div>
<p><a href="{home_url}" class="cta-btn">Order Again</a></p>"#,
        name = escape_html(&order.customer_name),
        restaurant = RESTAURANT_NAME,
        items = items,
        total = money(order.total),
        stars = stars,
        rating_url = rating_url,
        home_url = home_url,
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: "Your Order is Complete - Thank You!".to_string(),
        html: wrap_layout(&body),
    }
}

pub fn render_reservation_approved(reservation: &reservations::Model) -> EmailMessage {
    let date = reservation.date;
    let body = format!(
        r#"<h2>Reservation Approved</h2>
<p>Hi {name},</p>
<p>Your reservation has been <strong>approved</strong>.</p>
<p>
  <strong>Date:</strong> {weekday} {date}<br/>
  <strong>Time:</strong> {time}<br/>
  <strong>Guests:</strong> {guests}
</p>
<p>We look forward to serving you!</p>"#,
        name = escape_html(&reservation.name),
        weekday = date.weekday(),
        date = date.format("%b %d %Y"),
        time = escape_html(&reservation.time),
        guests = reservation.guests,
    );

    EmailMessage {
        to: reservation.email.clone(),
        subject: format!("Your Reservation is Approved! - {}", RESTAURANT_NAME),
        html: wrap_layout(&body),
    }
}

pub fn render_reservation_rejected(reservation: &reservations::Model) -> EmailMessage {
    let body = format!(
        r#"<h2>Reservation Update</h2>
<p>Hi {name},</p>
<p>We're sorry to inform you that your reservation request could <strong>not be approved</strong>.</p>
<p>Please contact us if you'd like to choose another time.</p>"#,
        name = escape_html(&reservation.name),
    );

    EmailMessage {
        to: reservation.email.clone(),
        subject: format!("Reservation Update - {}", RESTAURANT_NAME),
        html: wrap_layout(&body),
    }
}

fn wrap_layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
<div class="container" style="max-width: 600px; margin: 0 auto;">
<div class="header" style="background: #1a1a1a; color: #ff6b35; padding: 30px; text-align: center;">
  <strong>CLUB GRILLE</strong><br><small>Where Steaks Meet Style</small>
</div>
<div class="content" style="padding: 30px;">
{body}
<p>
  <strong>Contact Information:</strong><br>
  {phone}<br>
  {email}<br>
  {address}
</p>
<p>Best regards,<br><strong>The {restaurant} Team</strong></p>
</div>
<div class="footer" style="background: #f5f5f5; padding: 20px; text-align: center;">
  <p><strong>Opening Hours</strong><br>{hours}</p>
</div>
</div>
</body>
</html>"#,
        body = body,
        phone = CONTACT_PHONE,
        email = CONTACT_EMAIL,
        address = escape_html(CONTACT_ADDRESS),
        restaurant = RESTAURANT_NAME,
        hours = OPENING_HOURS,
    )
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Customer-supplied text ends up inside HTML; escape the five specials.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderItem;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn sample_order(payment_method: &str) -> OrderResponse {
        let now = Utc::now().fixed_offset();
        OrderResponse {
            id: "order-42".into(),
            customer_name: "Tanvir <b>".into(),
            customer_email: "tanvir@example.com".into(),
            customer_phone: "01711111111".into(),
            delivery_address: "GEC Circle, Chattogram".into(),
            items: vec![OrderItem {
                id: None,
                name: "King Prawn".into(),
                price: dec!(1150),
                qty: 2,
            }],
            subtotal: dec!(2300),
            tax: dec!(115),
            total: dec!(2465),
            payment_method: payment_method.into(),
            bkash_number: Some("01711111111".into()),
            bkash_transaction_id: Some("TX12345678".into()),
            bkash_amount: Some(dec!(2465)),
            notes: None,
            status: "pending".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_reservation() -> reservations::Model {
        reservations::Model {
            id: "res-1".into(),
            name: "Farhana".into(),
            email: "farhana@example.com".into(),
            phone: "01922222222".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            time: "7:30 PM".into(),
            guests: 6,
            message: None,
            status: "pending".into(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_confirmation_escapes_customer_text() {
        let message = render_order_confirmation(&sample_order("cash"));
        assert_eq!(message.to, "tanvir@example.com");
        assert!(message.html.contains("Tanvir &lt;b&gt;"));
        assert!(!message.html.contains("Tanvir <b>"));
        assert!(message.html.contains("Cash on Delivery"));
        assert!(message.html.contains("BDT 2465.00"));
    }

    #[test]
    fn test_confirmation_includes_wallet_details() {
        let message = render_order_confirmation(&sample_order("bkash"));
        assert!(message.html.contains("bKash Payment Details"));
        assert!(message.html.contains("TX12345678"));
        assert!(!message.html.contains("Cash on Delivery"));
    }

    #[test]
    fn test_completion_links_to_rating_page() {
        let message = render_order_completion(
            &sample_order("cash"),
            "https://clubgrille.com/rate-order/order-42",
            "https://clubgrille.com",
        );
        assert!(message.html.contains("https://clubgrille.com/rate-order/order-42?rating=5"));
        assert!(message.html.contains("https://clubgrille.com/rate-order/order-42?rating=1"));
        // Line totals, not unit prices
        assert!(message.html.contains("BDT 2300.00"));
    }

    #[test]
    fn test_reservation_templates() {
        let reservation = sample_reservation();

        let approved = render_reservation_approved(&reservation);
        assert!(approved.subject.contains("Approved"));
        assert!(approved.html.contains("Fri Mar 14 2025"));
        assert!(approved.html.contains("<strong>Guests:</strong> 6"));

        let rejected = render_reservation_rejected(&reservation);
        assert_eq!(rejected.to, "farhana@example.com");
        assert!(rejected.html.contains("not be approved"));
    }

    #[test]
    fn test_rating_url_trims_trailing_slash() {
        let notifier = Notifier::new(
            Arc::new(crate::services::email::DisabledEmailSender),
            "http://localhost:3000/",
        );
        assert_eq!(
            notifier.rating_url("abc"),
            "http://localhost:3000/rate-order/abc"
        );
    }
}

//! End-to-end checkout authorization scenarios against a canned
//! single-response HTTP stub.

use palmpay::checkout::{AuthMethod, AuthOutcome, Cart, CheckoutAuthorizer, CheckoutError};
use palmpay::ledger::{LedgerClient, LedgerConfig};
use std::io::{Read, Write};
use std::net::TcpListener;

/// Serves exactly one canned HTTP response on a local port.
///
/// Reads the full request (headers plus declared body) before
/// answering so the client never sees a half-closed connection.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");

    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        let mut expected = None;
        loop {
            let Ok(n) = stream.read(&mut buf) else { break };
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);

            if expected.is_none() {
                if let Some(header_end) = find_header_end(&request) {
                    let headers = String::from_utf8_lossy(&request[..header_end]);
                    let content_length = headers
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    expected = Some(header_end + 4 + content_length);
                }
            }
            if let Some(total) = expected {
                if request.len() >= total {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
    });

    format!("http://{addr}")
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n")
}

fn authorizer_for(base_url: String) -> CheckoutAuthorizer {
    CheckoutAuthorizer::new(LedgerClient::new(LedgerConfig {
        base_url,
        token: Some("test-token".to_string()),
    }))
}

fn cart_totalling_seven() -> Cart {
    let mut cart = Cart::new();
    cart.add("coffee", 3.0, 2);
    cart.add("water", 1.0, 1);
    cart
}

#[tokio::test]
async fn out_of_bound_topup_is_rejected_before_any_network_call() {
    // No listener exists at this address; reaching the network layer
    // would surface as a Failed outcome, not a local error.
    let mut authorizer = authorizer_for("http://127.0.0.1:1".to_string());

    let result = authorizer
        .top_up(AuthMethod::Manual, "PALM_1_abcdefghi", 1500.0)
        .await;

    match result {
        Err(CheckoutError::AmountOutOfRange { amount }) => assert_eq!(amount, 1500.0),
        other => panic!("expected local bound rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn insufficient_balance_renders_both_figures_verbatim() {
    let base = serve_once(
        "402 Payment Required",
        r#"{"error":"Insufficient balance","currentBalance":5,"requiredAmount":7}"#,
    );
    let mut authorizer = authorizer_for(base);
    let cart = cart_totalling_seven();

    let attempt = authorizer
        .purchase(AuthMethod::Manual, "PALM_1_abcdefghi", &cart)
        .await
        .unwrap();

    assert_eq!(
        attempt.outcome,
        AuthOutcome::InsufficientBalance {
            current_balance: 5.0,
            required_amount: 7.0,
        }
    );
    assert_eq!(
        attempt.outcome.to_string(),
        "Insufficient balance. Current: ₭5, Required: ₭7"
    );
    // The cart was not cleared by a rejection.
    assert!(!cart.is_empty());
}

#[tokio::test]
async fn approved_purchase_carries_confirmation_details() {
    let base = serve_once("200 OK", r#"{"order":{"id":"ord-42","amount":"7"}}"#);
    let mut authorizer = authorizer_for(base);
    let cart = cart_totalling_seven();

    let attempt = authorizer
        .purchase(AuthMethod::Scan, "PALM_1_abcdefghi", &cart)
        .await
        .unwrap();

    match attempt.outcome {
        AuthOutcome::Approved(confirmation) => {
            assert_eq!(confirmation.order_id.as_deref(), Some("ord-42"));
            assert_eq!(confirmation.amount, 7.0);
            assert_eq!(confirmation.item_count, 2);
        }
        other => panic!("expected approval, got {other:?}"),
    }
    assert_eq!(attempt.amount, 7.0);
    assert_eq!(attempt.code, "PALM_1_abcdefghi");
}

#[tokio::test]
async fn invalid_code_prompts_rescan() {
    let base = serve_once("401 Unauthorized", r#"{"error":"Invalid palm code"}"#);
    let mut authorizer = authorizer_for(base);

    let attempt = authorizer
        .purchase(AuthMethod::Manual, "PALM_bogus", &cart_totalling_seven())
        .await
        .unwrap();

    assert_eq!(attempt.outcome, AuthOutcome::InvalidCode);
    assert_eq!(
        attempt.outcome.to_string(),
        "Palm verification failed. Please check your palm code or try scanning again."
    );
}

#[tokio::test]
async fn unverified_palm_prompts_registration() {
    let base = serve_once("403 Forbidden", r#"{"error":"Palm not verified"}"#);
    let mut authorizer = authorizer_for(base);

    let attempt = authorizer
        .top_up(AuthMethod::Scan, "PALM_1_abcdefghi", 100.0)
        .await
        .unwrap();

    assert_eq!(attempt.outcome, AuthOutcome::NotVerified);
}

#[tokio::test]
async fn accepted_topup_is_approved_with_amount() {
    let base = serve_once("200 OK", r#"{"user":{"id":"u1","amount":"250"}}"#);
    let mut authorizer = authorizer_for(base);

    let attempt = authorizer
        .top_up(AuthMethod::Manual, "PALM_1_abcdefghi", 100.0)
        .await
        .unwrap();

    match attempt.outcome {
        AuthOutcome::Approved(confirmation) => {
            assert_eq!(confirmation.amount, 100.0);
            assert_eq!(confirmation.item_count, 0);
            assert!(confirmation.order_id.is_none());
        }
        other => panic!("expected approval, got {other:?}"),
    }
}

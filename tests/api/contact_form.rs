use crate::helpers::{spawn_app, spawn_app_with};
use portfolio::controllers::SubmissionState;
use portfolio::dom::Dom;
use std::time::Duration;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const SUCCESS_STATUS: &str = "Thank you! Your message has been sent successfully.";
const FAILURE_STATUS: &str = "Oops! Something went wrong. Please try again later.";

fn accepted() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "message": "Email sent successfully!"
    }))
}

#[tokio::test]
async fn a_valid_form_is_posted_once_with_its_fields_key_and_subject() {
    // Arrange
    let mut app = spawn_app().await;
    app.fill_form(
        "  Ada Lovelace ",
        "ada@example.com",
        "I would love to talk about your projects.",
    );

    Mock::given(path("/submit"))
        .and(method("POST"))
        .and(header("Accept", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "access_key": "test-access-key",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "message": "I would love to talk about your projects.",
            "subject": "New message from Ada Lovelace - Portfolio Contact Form"
        })))
        .respond_with(accepted())
        .expect(1)
        .mount(&app.submission_server)
        .await;

    // Act
    let prevented = app.submit_form().await;

    // Assert
    assert!(prevented);
    // Mock verifies on Drop that exactly one request went out
}

#[tokio::test]
async fn a_delivered_message_clears_the_form_and_then_the_status() {
    // Arrange
    let mut app = spawn_app().await;
    app.fill_valid_form();
    Mock::given(path("/submit"))
        .and(method("POST"))
        .respond_with(accepted())
        .expect(1)
        .mount(&app.submission_server)
        .await;

    // Act
    app.submit_form().await;

    // Assert
    let page = &app.page;
    assert_eq!(app.text(page.status), SUCCESS_STATUS);
    assert!(app.has_class(page.status, "success"));
    for input in [page.name, page.email, page.message] {
        assert_eq!(app.value(input), "");
    }
    assert!(!app.dom().is_disabled(page.submit));
    assert_eq!(app.text(page.submit), "Send Message");
    assert_eq!(app.app.contact_form().state(), &SubmissionState::Idle);

    let status = app.page.status;
    app.advance(Duration::from_millis(4_999));
    assert_eq!(app.text(status), SUCCESS_STATUS);

    app.advance(Duration::from_millis(1));
    assert_eq!(app.text(status), "");
    assert!(!app.has_class(status, "success"));
    assert_eq!(app.app.next_deadline(), None);
}

#[tokio::test]
async fn a_failed_delivery_keeps_the_form_and_restores_the_submit_button() {
    let test_cases = vec![
        (
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "message": "Invalid access key"
            })),
            "the service rejected the message",
        ),
        (ResponseTemplate::new(500), "the service is down"),
        (
            ResponseTemplate::new(200).set_body_string("<html>Bad gateway</html>"),
            "the service answered with something that is not JSON",
        ),
    ];

    for (response, description) in test_cases {
        // Arrange
        let mut app = spawn_app().await;
        app.fill_valid_form();
        Mock::given(path("/submit"))
            .and(method("POST"))
            .respond_with(response)
            .expect(1)
            .mount(&app.submission_server)
            .await;

        // Act
        app.submit_form().await;

        // Assert
        let page = &app.page;
        assert_eq!(
            app.text(page.status),
            FAILURE_STATUS,
            "The visitor was not told about the failure when {}.",
            description
        );
        assert!(app.has_class(page.status, "error"));
        assert_eq!(
            app.value(page.name),
            "Ada Lovelace",
            "The form was cleared when {}.",
            description
        );
        assert!(!app.dom().is_disabled(page.submit));
        assert_eq!(app.text(page.submit), "Send Message");
        // Failures are not cleared on a timer.
        assert_eq!(app.app.next_deadline(), None);
    }
}

#[tokio::test]
async fn a_service_that_takes_too_long_is_reported_as_a_failure() {
    // Arrange
    let mut app = spawn_app_with(|c| c.submission.timeout_milliseconds = 200).await;
    app.fill_valid_form();
    Mock::given(any())
        .respond_with(accepted().set_delay(Duration::from_secs(180)))
        .mount(&app.submission_server)
        .await;

    // Act
    app.submit_form().await;

    // Assert
    assert_eq!(app.text(app.page.status), FAILURE_STATUS);
    assert!(!app.dom().is_disabled(app.page.submit));
    assert_eq!(app.value(app.page.message), "I would love to talk about your projects.");
}

#[tokio::test]
async fn an_invalid_form_is_never_sent_and_every_bad_field_is_flagged() {
    let test_cases = vec![
        (
            ("", "", ""),
            [
                "Name is required",
                "Email is required",
                "Message is required",
            ],
            "all fields empty",
        ),
        (
            ("A", "not-an-email", "too short"),
            [
                "Name must be at least 2 characters",
                "Please enter a valid email address",
                "Message must be at least 10 characters",
            ],
            "every field malformed",
        ),
        (
            ("   ", "ada@example", "          "),
            [
                "Name is required",
                "Please enter a valid email address",
                "Message is required",
            ],
            "whitespace only and a domain without a dot",
        ),
    ];

    for ((name, email, message), expected, description) in test_cases {
        // Arrange
        let mut app = spawn_app().await;
        app.fill_form(name, email, message);
        Mock::given(any())
            .respond_with(accepted())
            // We assert that no request is fired at the service!
            .expect(0)
            .mount(&app.submission_server)
            .await;

        // Act
        let prevented = app.submit_form().await;

        // Assert
        assert!(prevented);
        let page = &app.page;
        let fields = [
            (page.name, page.name_group, page.name_error),
            (page.email, page.email_group, page.email_error),
            (page.message, page.message_group, page.message_error),
        ];
        for ((input, group, error), expected) in fields.into_iter().zip(expected) {
            assert_eq!(
                app.text(error),
                expected,
                "Unexpected error message with {}.",
                description
            );
            assert!(app.has_class(group, "error"));
            assert_eq!(
                app.dom().attribute(input, "aria-invalid").as_deref(),
                Some("true")
            );
        }
        assert_eq!(app.text(page.status), "");
        assert!(!app.dom().is_disabled(page.submit));
        assert_eq!(app.text(page.submit), "Send Message");
    }
}

#[tokio::test]
async fn only_the_invalid_fields_are_flagged() {
    // Arrange
    let mut app = spawn_app().await;
    app.fill_form("Ada Lovelace", "ada@", "I would love to talk about your projects.");
    Mock::given(any())
        .respond_with(accepted())
        .expect(0)
        .mount(&app.submission_server)
        .await;

    // Act
    app.submit_form().await;

    // Assert
    let page = &app.page;
    assert!(app.has_class(page.email_group, "error"));
    assert!(!app.has_class(page.name_group, "error"));
    assert!(!app.has_class(page.message_group, "error"));
    assert_eq!(app.text(page.name_error), "");
    assert_eq!(app.dom().attribute(page.name, "aria-invalid"), None);
}

#[tokio::test]
async fn fixing_the_form_and_submitting_again_clears_the_old_errors() {
    // Arrange
    let mut app = spawn_app().await;
    Mock::given(path("/submit"))
        .respond_with(accepted())
        .expect(1)
        .mount(&app.submission_server)
        .await;
    app.fill_form("A", "ada@example.com", "I would love to talk about your projects.");
    app.submit_form().await;
    assert!(app.has_class(app.page.name_group, "error"));

    // Act
    app.fill_valid_form();
    app.submit_form().await;

    // Assert
    assert!(!app.has_class(app.page.name_group, "error"));
    assert_eq!(app.text(app.page.name_error), "");
    assert_eq!(app.text(app.page.status), SUCCESS_STATUS);
}

#[tokio::test]
async fn leaving_a_field_revalidates_it_and_typing_clears_the_error() {
    // Arrange
    let mut app = spawn_app().await;
    let (email, group, error) = (app.page.email, app.page.email_group, app.page.email_error);
    app.app.dom_mut().set_value(email, "ada");

    // Act
    app.app.on_blur(email);

    // Assert
    assert!(app.has_class(group, "error"));
    assert_eq!(app.text(error), "Please enter a valid email address");

    // Act
    app.app.dom_mut().set_value(email, "ada@");
    app.app.on_input(email);

    // Assert
    assert!(!app.has_class(group, "error"));
    assert_eq!(app.text(error), "");
}

#[tokio::test]
async fn leaving_an_empty_field_does_not_flag_it() {
    let mut app = spawn_app().await;
    let name = app.page.name;

    app.app.on_blur(name);

    assert!(!app.has_class(app.page.name_group, "error"));
    assert_eq!(app.text(app.page.name_error), "");
}

#[tokio::test]
async fn a_new_submission_cancels_the_pending_status_clear() {
    // Arrange
    let mut app = spawn_app().await;
    Mock::given(path("/submit"))
        .respond_with(accepted())
        .expect(2)
        .mount(&app.submission_server)
        .await;
    app.fill_valid_form();
    app.submit_form().await;
    app.advance(Duration::from_millis(3_000));

    // Act
    app.fill_valid_form();
    app.submit_form().await;
    // The first timer would have fired at 5s.
    app.advance(Duration::from_millis(2_500));

    // Assert
    assert_eq!(app.text(app.page.status), SUCCESS_STATUS);
    app.advance(Duration::from_millis(2_500));
    assert_eq!(app.text(app.page.status), "");
}

#[tokio::test]
async fn a_page_without_a_contact_form_ignores_submits() {
    let mut app = portfolio::startup::Application::build(
        portfolio::configuration::base_configuration().expect("Failed to read configuration."),
        portfolio::dom::InMemoryDom::new(),
        Box::new(portfolio::storage::InMemoryStorage::new()),
        Box::new(portfolio::clock::ManualClock::new()),
    )
    .expect("Failed to build application");

    assert!(app.bindings().contact.is_none());
    assert!(!app.on_submit().await);
}

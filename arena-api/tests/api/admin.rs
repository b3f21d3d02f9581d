use crate::helpers::TestApp;
use arena_api::domain::RatingEvent;
use uuid::Uuid;

#[tokio::test]
async fn reversing_an_event_restores_the_previous_standings() {
    // Arrange
    let app = TestApp::spawn().await;
    app.register("Alpha", "acme").await;
    app.register("Beta", "acme").await;
    let response = app.record(Uuid::new_v4(), "alpha", "beta", "a_wins").await;
    let event: RatingEvent = response.json().await.expect("Failed to parse as JSON");

    // Act
    let response = app
        .post("reverse", format!("event_id={}", event.id))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let reversal: RatingEvent = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(reversal.reverses, Some(event.id));
    assert_eq!(reversal.rating_a_after, 1500);
    assert_eq!(reversal.rating_b_after, 1500);

    let status = app.post_entrant("slug=alpha".into()).await;
    let status: serde_json::Value = status.json().await.expect("Failed to parse as JSON");
    assert_eq!(status["snapshot"]["rating"], 1500);
    assert_eq!(status["snapshot"]["wins"], 0);
}

#[tokio::test]
async fn an_event_cannot_be_reversed_twice() {
    // Arrange
    let app = TestApp::spawn().await;
    app.register("Alpha", "acme").await;
    app.register("Beta", "acme").await;
    let response = app.record(Uuid::new_v4(), "alpha", "beta", "a_wins").await;
    let event: RatingEvent = response.json().await.expect("Failed to parse as JSON");

    // Act
    let first = app
        .post("reverse", format!("event_id={}", event.id))
        .await;
    let second = app
        .post("reverse", format!("event_id={}", event.id))
        .await;

    // Assert
    assert_eq!(200, first.status().as_u16());
    assert_eq!(409, second.status().as_u16());
}

#[tokio::test]
async fn reversing_a_reversal_returns_a_400() {
    // Arrange
    let app = TestApp::spawn().await;
    app.register("Alpha", "acme").await;
    app.register("Beta", "acme").await;
    let response = app.record(Uuid::new_v4(), "alpha", "beta", "a_wins").await;
    let event: RatingEvent = response.json().await.expect("Failed to parse as JSON");
    let response = app
        .post("reverse", format!("event_id={}", event.id))
        .await;
    let reversal: RatingEvent = response.json().await.expect("Failed to parse as JSON");

    // Act
    let response = app
        .post("reverse", format!("event_id={}", reversal.id))
        .await;

    // Assert: a client mistake, not an internal failure.
    assert_eq!(400, response.status().as_u16());

    let status = app.post_entrant("slug=alpha".into()).await;
    let status: serde_json::Value = status.json().await.expect("Failed to parse as JSON");
    assert_eq!(status["snapshot"]["rating"], 1500);
}

#[tokio::test]
async fn reversing_a_missing_event_returns_a_404() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post("reverse", "event_id=999".into()).await;

    // Assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn a_rebuild_leaves_the_standings_unchanged() {
    // Arrange
    let app = TestApp::spawn().await;
    app.register("Alpha", "acme").await;
    app.register("Beta", "acme").await;
    app.record(Uuid::new_v4(), "alpha", "beta", "a_wins").await;
    let before: serde_json::Value = app
        .post_standings("many=10".into())
        .await
        .json()
        .await
        .expect("Failed to parse as JSON");

    // Act
    let response = app.post("rebuild", String::new()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let after: serde_json::Value = app
        .post_standings("many=10".into())
        .await
        .json()
        .await
        .expect("Failed to parse as JSON");
    assert_eq!(before, after);
}

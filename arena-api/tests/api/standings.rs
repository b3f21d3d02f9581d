use crate::helpers::TestApp;
use arena_api::domain::StandingRow;
use uuid::Uuid;

#[tokio::test]
async fn standings_reflect_recorded_outcomes() {
    // Arrange
    let app = TestApp::spawn().await;
    app.register("Alpha", "acme").await;
    app.register("Beta", "acme").await;
    let response = app.record(Uuid::new_v4(), "alpha", "beta", "a_wins").await;
    assert_eq!(200, response.status().as_u16());

    // Act
    let response = app.post_standings("many=10".into()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let rows: Vec<StandingRow> = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].entrant.slug, "alpha");
    assert_eq!(rows[0].snapshot.rating, 1516);
    assert_eq!(rows[1].rank, 2);
    assert_eq!(rows[1].entrant.slug, "beta");
    assert_eq!(rows[1].snapshot.rating, 1484);
}

#[tokio::test]
async fn standings_are_identical_across_repeated_calls() {
    // Arrange
    let app = TestApp::spawn().await;
    for name in ["Alpha", "Beta", "Gamma", "Delta"] {
        app.register(name, "acme").await;
    }
    app.record(Uuid::new_v4(), "alpha", "beta", "draw").await;
    app.record(Uuid::new_v4(), "gamma", "delta", "b_wins").await;

    // Act
    let first: Vec<StandingRow> = app
        .post_standings("many=10".into())
        .await
        .json()
        .await
        .expect("Failed to parse as JSON");
    let second: Vec<StandingRow> = app
        .post_standings("many=10".into())
        .await
        .json()
        .await
        .expect("Failed to parse as JSON");

    // Assert
    assert_eq!(first, second);
    assert!(first.iter().enumerate().all(|(i, row)| row.rank == i + 1));
}

#[tokio::test]
async fn standings_paginate_with_a_start_offset() {
    // Arrange
    let app = TestApp::spawn().await;
    app.register("Alpha", "acme").await;
    app.register("Beta", "acme").await;
    app.record(Uuid::new_v4(), "alpha", "beta", "a_wins").await;

    // Act
    let response = app.post_standings("many=10&start=1".into()).await;

    // Assert
    let rows: Vec<StandingRow> = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rank, 2);
    assert_eq!(rows[0].entrant.slug, "beta");
}

#[tokio::test]
async fn standings_returns_a_400_when_data_is_missing() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![("start=0", "missing many")];

    for (body, error_message) in test_cases {
        // Act
        let response = app.post_standings(body.into()).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn standings_returns_a_400_when_fields_are_present_but_invalid() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![
        ("many=", "empty many"),
        ("many=a", "non-numeric many"),
        ("many=201", "more than 200 rows"),
        ("many=10&start=987654321", "start too big"),
    ];

    for (body, description) in test_cases {
        // Act
        let response = app.post_standings(body.into()).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
    }
}

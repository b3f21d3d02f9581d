use crate::helpers::TestApp;

#[tokio::test]
async fn register_returns_a_200_and_a_slug_derived_from_the_name() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let entrant = app.register("Alpha+One", "acme").await;

    // Assert
    assert_eq!(entrant.display_name, "Alpha One");
    assert_eq!(entrant.provider, "acme");
    assert_eq!(entrant.slug, "alpha-one");
}

#[tokio::test]
async fn colliding_names_get_distinct_stable_slugs() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let first = app.register("GPT-4", "openai").await;
    let second = app.register("gpt+4", "openai").await;

    // Assert
    assert_eq!(first.slug, "gpt-4");
    assert_eq!(second.slug, "gpt-4-2");
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn register_returns_a_400_when_data_is_missing() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![
        ("name=Alpha", "missing provider"),
        ("provider=acme", "missing name"),
        ("", "missing both"),
    ];

    for (body, error_message) in test_cases {
        // Act
        let response = app.post_register(body.into()).await;

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
async fn register_returns_a_400_for_invalid_names() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![
        ("name=+&provider=acme", "whitespace-only name"),
        ("name=%3Cscript%3E&provider=acme", "forbidden characters"),
    ];

    for (body, description) in test_cases {
        // Act
        let response = app.post_register(body.into()).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
    }
}

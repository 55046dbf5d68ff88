/// E2E tests for the public blog and the admin area
/// These tests run against a real server instance started with
/// TINTA_TEST_SEED=1 so that /test/seed is available
use reqwest::Client;

const BASE_URL: &str = "http://localhost:8000";

/// Helper to create an authenticated session
async fn create_test_session(client: &Client) -> Result<String, Box<dyn std::error::Error>> {
    // Use the /test/seed endpoint if TINTA_TEST_SEED is set
    let response = client.get(format!("{}/test/seed", BASE_URL)).send().await?;

    // Extract session cookie
    let cookie_value = response
        .cookies()
        .find(|c| c.name() == "tinta_session")
        .map(|c| c.value().to_string());

    cookie_value.ok_or_else(|| "No session cookie returned".into())
}

/// Pull the first /post/{id} link out of a rendered page.
fn first_post_id(body: &str) -> Option<i64> {
    let rest = body.split("/post/").nth(1)?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[tokio::test]
#[ignore] // Run with: cargo test --test e2e_blog -- --ignored
async fn test_home_page_loads() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client.get(BASE_URL).send().await?;

    assert_eq!(response.status(), 200);
    let body = response.text().await?;
    assert!(body.contains("Tinta"));
    assert!(body.contains("Get in touch"));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_posts_page_loads() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client.get(format!("{}/posts", BASE_URL)).send().await?;

    assert_eq!(response.status(), 200);
    let body = response.text().await?;
    assert!(body.contains("Posts"));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_unknown_page_returns_404() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client
        .get(format!("{}/definitely/not/a/page", BASE_URL))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_dashboard_requires_login() -> Result<(), Box<dyn std::error::Error>> {
    // No cookie store and no redirect following, so the raw 303 is visible
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let response = client.get(format!("{}/dashboard", BASE_URL)).send().await?;

    assert_eq!(response.status(), 303);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/login");

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_bad_login_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .form(&[("username", "nobody"), ("password", "nothing")])
        .send()
        .await?;

    assert_eq!(response.status(), 401);
    let body = response.text().await?;
    assert!(body.contains("Invalid username or password"));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_contact_form_requires_all_fields() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client
        .post(BASE_URL)
        .form(&[("name", ""), ("email", ""), ("subject", ""), ("message", "")])
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body = response.text().await?;
    assert!(body.contains("All fields are required"));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_contact_form_rejects_bad_email() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client
        .post(BASE_URL)
        .form(&[
            ("name", "Ada"),
            ("email", "not-an-email"),
            ("subject", "Hello"),
            ("message", "Just checking in."),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body = response.text().await?;
    assert!(body.contains("Please enter a valid email address"));
    // The submitted values come back so nothing is lost on a typo
    assert!(body.contains("Just checking in."));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_admin_can_publish_and_visitors_can_comment(
) -> Result<(), Box<dyn std::error::Error>> {
    let admin = Client::builder().cookie_store(true).build()?;
    let _session = create_test_session(&admin).await?;

    // Publish a post with a unique title
    let title = format!("E2E post {}", uuid::Uuid::now_v7());
    let form = reqwest::multipart::Form::new()
        .text("title", title.clone())
        .text("text", "Written by the test suite.")
        .text("tags", "e2e, testing");
    let response = admin
        .post(format!("{}/create_post", BASE_URL))
        .multipart(form)
        .send()
        .await?;

    // Following the redirect lands back on the dashboard
    assert_eq!(response.status(), 200);
    let body = response.text().await?;
    assert!(body.contains(&title), "Dashboard should list the new post");

    // The post shows up on the public list
    let visitor = Client::new();
    let listing = visitor
        .get(format!("{}/posts", BASE_URL))
        .send()
        .await?
        .text()
        .await?;
    assert!(listing.contains(&title));

    // And a visitor can comment on it
    let post_id = first_post_id(&listing).ok_or("No post link found on /posts")?;
    let response = visitor
        .post(format!("{}/post/{}", BASE_URL, post_id))
        .form(&[
            ("name", "E2E visitor"),
            ("message", "Leaving a mark."),
            ("parent_id", ""),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let detail = response.text().await?;
    assert!(detail.contains("E2E visitor"));
    assert!(detail.contains("Leaving a mark."));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_logout_clears_the_session() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let _session = create_test_session(&client).await?;

    // Logged in: the dashboard renders
    let response = client.get(format!("{}/dashboard", BASE_URL)).send().await?;
    assert_eq!(response.status(), 200);

    // Log out, which clears the cookie
    let response = client.post(format!("{}/logout", BASE_URL)).send().await?;
    assert_eq!(response.status(), 303);

    // Logged out: back to the login page
    let response = client.get(format!("{}/dashboard", BASE_URL)).send().await?;
    assert_eq!(response.status(), 303);

    Ok(())
}

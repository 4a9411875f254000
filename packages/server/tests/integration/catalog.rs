use serde_json::json;

use crate::common::{TestApp, routes};

mod genres {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_a_genre() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("admin1@example.com", "password123", "admin")
            .await;

        let res = app
            .post_with_token(routes::GENRES, &json!({"name": "Action"}), &token)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["name"], "Action");
        assert!(res.body["id"].is_number());
    }

    #[tokio::test]
    async fn regular_user_cannot_create_a_genre() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("user1@example.com", "password123")
            .await;

        let res = app
            .post_with_token(routes::GENRES, &json!({"name": "Action"}), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn duplicate_genre_name_returns_conflict() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("admin2@example.com", "password123", "admin")
            .await;

        let first = app
            .post_with_token(routes::GENRES, &json!({"name": "Drama"}), &token)
            .await;
        assert_eq!(first.status, 201);

        let second = app
            .post_with_token(routes::GENRES, &json!({"name": "Drama"}), &token)
            .await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn empty_genre_name_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("admin3@example.com", "password123", "admin")
            .await;

        let res = app
            .post_with_token(routes::GENRES, &json!({"name": "   "}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn genres_are_listed_in_id_order() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin4@example.com", "password123", "admin")
            .await;
        let user = app
            .create_authenticated_user("user4@example.com", "password123")
            .await;

        app.create_genre(&admin, "Action").await;
        app.create_genre(&admin, "Comedy").await;

        let res = app.get_with_token(routes::GENRES, &user).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .expect("list response should be an array")
            .iter()
            .map(|g| g["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Action", "Comedy"]);
    }

    #[tokio::test]
    async fn listing_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::GENRES).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod actors {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_an_actor_with_full_name() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("admin1@example.com", "password123", "admin")
            .await;

        let res = app
            .post_with_token(
                routes::ACTORS,
                &json!({"first_name": "Tom", "last_name": "Hanks"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["first_name"], "Tom");
        assert_eq!(res.body["last_name"], "Hanks");
        assert_eq!(res.body["full_name"], "Tom Hanks");
    }

    #[tokio::test]
    async fn regular_user_cannot_create_an_actor() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("user1@example.com", "password123")
            .await;

        let res = app
            .post_with_token(
                routes::ACTORS,
                &json!({"first_name": "Tom", "last_name": "Hanks"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn created_actor_appears_in_listing() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin2@example.com", "password123", "admin")
            .await;

        let id = app.create_actor(&admin, "Meryl", "Streep").await;

        let res = app.get_with_token(routes::ACTORS, &admin).await;
        assert_eq!(res.status, 200);
        let listed = res
            .body
            .as_array()
            .expect("list response should be an array")
            .iter()
            .any(|a| a["id"].as_i64() == Some(id as i64) && a["full_name"] == "Meryl Streep");
        assert!(listed);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("admin3@example.com", "password123", "admin")
            .await;

        let res = app
            .post_with_token(
                routes::ACTORS,
                &json!({"first_name": "", "last_name": "Hanks"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

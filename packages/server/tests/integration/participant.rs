use crate::common::{TestApp, routes};
use serde_json::json;

fn valid_participant_body(nim: &str, email: &str) -> serde_json::Value {
    json!({
        "nim": nim,
        "full_name": "Budi Santoso",
        "email": email,
        "phone": "+6281234567",
    })
}

mod participant_creation {
    use super::*;

    #[tokio::test]
    async fn creates_a_participant_with_generated_id() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::PARTICIPANTS, &valid_participant_body("A1", "b@x.com"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].as_i64().is_some());
        assert_eq!(res.body["nim"], "A1");
        assert_eq!(res.body["full_name"], "Budi Santoso");
        assert_eq!(res.body["email"], "b@x.com");
        assert_eq!(res.body["phone"], "+6281234567");
        assert!(res.body["created_at"].is_string());
    }

    #[tokio::test]
    async fn created_participant_round_trips_through_get() {
        let app = TestApp::spawn().await;
        let created = app
            .post(routes::PARTICIPANTS, &valid_participant_body("A1", "b@x.com"))
            .await;
        let id = created.id();

        let res = app.get(&routes::participant(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        for field in ["nim", "full_name", "email", "phone"] {
            assert_eq!(res.body[field], created.body[field], "field {field}");
        }
        assert!(res.body["created_at"].is_string());
        assert_eq!(res.body["enrollments"], json!([]));
    }

    #[tokio::test]
    async fn each_required_field_is_enforced() {
        let app = TestApp::spawn().await;

        for field in ["nim", "full_name", "email", "phone"] {
            let mut absent = valid_participant_body("A1", "b@x.com");
            absent.as_object_mut().unwrap().remove(field);
            let res = app.post(routes::PARTICIPANTS, &absent).await;
            assert_eq!(res.status, 400, "absent {field}: {}", res.text);
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
            assert!(res.body["message"].as_str().unwrap().contains(field));

            let mut empty = valid_participant_body("A1", "b@x.com");
            empty[field] = json!("");
            let res = app.post(routes::PARTICIPANTS, &empty).await;
            assert_eq!(res.status, 400, "empty {field}: {}", res.text);
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn duplicate_nim_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.create_participant("A1", "first@x.com").await;

        let res = app
            .post(routes::PARTICIPANTS, &valid_participant_body("A1", "second@x.com"))
            .await;

        assert_eq!(res.status, 409, "{}", res.text);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.create_participant("A1", "b@x.com").await;

        let res = app
            .post(routes::PARTICIPANTS, &valid_participant_body("A2", "b@x.com"))
            .await;

        assert_eq!(res.status, 409, "{}", res.text);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn rejects_invalid_email_and_unknown_fields() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::PARTICIPANTS, &valid_participant_body("A1", "not-an-email"))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let mut body = valid_participant_body("A1", "b@x.com");
        body["role"] = json!("admin");
        let res = app.post(routes::PARTICIPANTS, &body).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod participant_queries {
    use super::*;

    #[tokio::test]
    async fn lists_newest_first() {
        let app = TestApp::spawn().await;
        let first = app.create_participant("A1", "a1@x.com").await;
        let second = app.create_participant("A2", "a2@x.com").await;
        let third = app.create_participant("A3", "a3@x.com").await;

        let res = app.get(routes::PARTICIPANTS).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.ids(),
            vec![third as i64, second as i64, first as i64]
        );
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::participant(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn non_integer_id_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get("/participants/abc").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn detail_includes_enrolled_classes() {
        let app = TestApp::spawn().await;
        let participant_id = app.create_participant("A1", "b@x.com").await;
        let class_id = app.create_class("Web Programming").await;
        app.enroll(participant_id, class_id).await;

        let res = app.get(&routes::participant(participant_id)).await;

        assert_eq!(res.status, 200);
        let enrollments = res.body["enrollments"].as_array().unwrap();
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0]["class"]["id"], class_id);
        assert_eq!(enrollments[0]["class"]["name"], "Web Programming");
        assert!(enrollments[0].get("participant").is_none());
    }
}

mod participant_update {
    use super::*;

    #[tokio::test]
    async fn merges_supplied_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_participant("A1", "b@x.com").await;

        let res = app
            .patch(
                &routes::participant(id),
                &json!({ "full_name": "Budi Setiawan" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["full_name"], "Budi Setiawan");
        assert_eq!(res.body["nim"], "A1");
        assert_eq!(res.body["email"], "b@x.com");
    }

    #[tokio::test]
    async fn empty_patch_returns_current_record() {
        let app = TestApp::spawn().await;
        let id = app.create_participant("A1", "b@x.com").await;

        let res = app.patch(&routes::participant(id), &json!({})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["nim"], "A1");
    }

    #[tokio::test]
    async fn blanking_a_required_field_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_participant("A1", "b@x.com").await;

        let res = app.patch(&routes::participant(id), &json!({ "nim": "" })).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("nim"));
    }

    #[tokio::test]
    async fn taking_another_participants_email_is_a_conflict() {
        let app = TestApp::spawn().await;
        app.create_participant("A1", "a1@x.com").await;
        let id = app.create_participant("A2", "a2@x.com").await;

        let res = app
            .patch(&routes::participant(id), &json!({ "email": "a1@x.com" }))
            .await;

        assert_eq!(res.status, 409, "{}", res.text);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(&routes::participant(9999), &json!({ "phone": "081234567890" }))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod participant_removal {
    use super::*;

    #[tokio::test]
    async fn remove_then_get_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_participant("A1", "b@x.com").await;

        let res = app.delete(&routes::participant(id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Participant deleted successfully");

        let res = app.get(&routes::participant(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn removing_unknown_participant_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::participant(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

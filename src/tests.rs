#[cfg(test)]
mod integration_tests {
    use std::collections::HashMap;

    use crate::handlers::auth::LoginRequest;
    use crate::handlers::invoices::CreateInvoiceRequest;
    use crate::handlers::leads::{
        CreateLeadRequest, MoveLeadStatusRequest, SetLeadAssigneeRequest, UpdateLeadRequest,
    };
    use crate::handlers::packages::CreatePackageRequest;
    use crate::handlers::pipeline::{CreateStageRequest, UpdateStageRequest};
    use crate::handlers::sales_persons::{CreateSalesPersonRequest, UpdateSalesPersonRequest};
    use crate::handlers::users::CreateUserRequest;
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rust_decimal::Decimal;

    async fn setup_server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    /// Seed stages/packages/admin through the API so lead and invoice
    /// tests have a pipeline to work with.
    async fn seed(server: &TestServer) {
        let response = server.post("/api/v1/seed").await;
        response.assert_status(StatusCode::OK);
    }

    fn lead_request(name: &str) -> CreateLeadRequest {
        CreateLeadRequest {
            name: name.to_string(),
            company: None,
            status_id: None,
            assigned_to: None,
            reminder_date: None,
            notes: None,
            emails: vec![],
            phones: vec![],
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = setup_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = setup_server().await;

        let create_request = CreateUserRequest {
            email: "sales1@test.local".to_string(),
            password: "secret".to_string(),
            role: "sales".to_string(),
            is_active: None,
        };

        let response = server.post("/api/v1/users").json(&create_request).await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["email"], "sales1@test.local");
        assert_eq!(body.data["role"], "sales");
        assert_eq!(body.data["is_active"], true);
        // The stored password never leaves the API
        assert!(body.data.get("password").is_none());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_conflicts() {
        let server = setup_server().await;

        let create_request = CreateUserRequest {
            email: "dup@test.local".to_string(),
            password: "secret".to_string(),
            role: "sales".to_string(),
            is_active: None,
        };

        let first = server.post("/api/v1/users").json(&create_request).await;
        first.assert_status(StatusCode::CREATED);

        let second = server.post("/api/v1/users").json(&create_request).await;
        second.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_user_rejects_unknown_role() {
        let server = setup_server().await;

        let response = server
            .post("/api/v1/users")
            .json(&serde_json::json!({
                "email": "who@test.local",
                "password": "secret",
                "role": "superuser"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = setup_server().await;
        seed(&server).await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "admin@crm.local".to_string(),
                password: "admin123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["email"], "admin@crm.local");
        assert_eq!(body.data["role"], "admin");
    }

    #[tokio::test]
    async fn test_login_wrong_password_unauthorized() {
        let server = setup_server().await;
        seed(&server).await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "admin@crm.local".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_unknown_email_unauthorized() {
        let server = setup_server().await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "nobody@test.local".to_string(),
                password: "whatever".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_inactive_user_unauthorized() {
        let server = setup_server().await;

        let create = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                email: "gone@test.local".to_string(),
                password: "secret".to_string(),
                role: "sales".to_string(),
                is_active: Some(false),
            })
            .await;
        create.assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "gone@test.local".to_string(),
                password: "secret".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sales_person_onboarding_creates_login() {
        let server = setup_server().await;

        let response = server
            .post("/api/v1/sales-persons")
            .json(&CreateSalesPersonRequest {
                name: "Asha Rao".to_string(),
                email: "asha@test.local".to_string(),
                phone: "9876543210".to_string(),
                password: "asha-pass".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["name"], "Asha Rao");
        assert_eq!(body.data["status"], "active");

        // The onboarded sales person can log straight in
        let login = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "asha@test.local".to_string(),
                password: "asha-pass".to_string(),
            })
            .await;
        login.assert_status(StatusCode::OK);
        let login_body: ApiResponse<serde_json::Value> = login.json();
        assert_eq!(login_body.data["role"], "sales");
    }

    #[tokio::test]
    async fn test_sales_person_duplicate_email_conflicts() {
        let server = setup_server().await;

        let request = CreateSalesPersonRequest {
            name: "First".to_string(),
            email: "taken@test.local".to_string(),
            phone: "9876543210".to_string(),
            password: "pass1".to_string(),
        };
        let first = server.post("/api/v1/sales-persons").json(&request).await;
        first.assert_status(StatusCode::CREATED);

        let second = server
            .post("/api/v1/sales-persons")
            .json(&CreateSalesPersonRequest {
                name: "Second".to_string(),
                email: "taken@test.local".to_string(),
                phone: "9123456780".to_string(),
                password: "pass2".to_string(),
            })
            .await;
        second.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_sales_person_rejects_short_phone() {
        let server = setup_server().await;

        let response = server
            .post("/api/v1/sales-persons")
            .json(&CreateSalesPersonRequest {
                name: "Short Phone".to_string(),
                email: "short@test.local".to_string(),
                phone: "12345".to_string(),
                password: "pass".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_lead_with_contacts() {
        let server = setup_server().await;
        seed(&server).await;

        let mut request = lead_request("Acme Corp deal");
        request.company = Some("Acme Corp".to_string());
        request.emails = vec![
            "buyer@acme.test".to_string(),
            "cfo@acme.test".to_string(),
        ];
        request.phones = vec!["9876543210".to_string()];

        let response = server.post("/api/v1/leads").json(&request).await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["name"], "Acme Corp deal");
        assert_eq!(body.data["emails"].as_array().unwrap().len(), 2);
        assert_eq!(body.data["phones"].as_array().unwrap().len(), 1);
        // With no stage given, the lead enters the first stage of the board
        let status_id = body.data["status_id"].as_i64().unwrap();

        let stages = server.get("/api/v1/pipeline/stages").await;
        let stages_body: ApiResponse<serde_json::Value> = stages.json();
        let first_stage = &stages_body.data.as_array().unwrap()[0];
        assert_eq!(status_id, first_stage["id"].as_i64().unwrap());
    }

    #[tokio::test]
    async fn test_create_lead_without_stages_conflicts() {
        let server = setup_server().await;

        let response = server
            .post("/api/v1/leads")
            .json(&lead_request("Too early"))
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_lead_validation_failures() {
        let server = setup_server().await;
        seed(&server).await;

        let mut empty_name = lead_request("");
        empty_name.emails = vec!["ok@test.local".to_string()];
        let response = server.post("/api/v1/leads").json(&empty_name).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let mut bad_email = lead_request("Bad email");
        bad_email.emails = vec!["not-an-email".to_string()];
        let response = server.post("/api/v1/leads").json(&bad_email).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let mut bad_phone = lead_request("Bad phone");
        bad_phone.phones = vec!["123".to_string()];
        let response = server.post("/api/v1/leads").json(&bad_phone).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_lead_replaces_contacts() {
        let server = setup_server().await;
        seed(&server).await;

        let mut request = lead_request("Contact churn");
        request.emails = vec!["old@test.local".to_string()];
        let create = server.post("/api/v1/leads").json(&request).await;
        create.assert_status(StatusCode::CREATED);
        let created: ApiResponse<serde_json::Value> = create.json();
        let lead_id = created.data["id"].as_i64().unwrap();

        let update = server
            .put(&format!("/api/v1/leads/{}", lead_id))
            .json(&UpdateLeadRequest {
                name: None,
                company: None,
                status_id: None,
                reminder_date: None,
                notes: Some("called twice".to_string()),
                emails: Some(vec![
                    "new@test.local".to_string(),
                    "second@test.local".to_string(),
                ]),
                phones: None,
            })
            .await;

        update.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = update.json();
        assert_eq!(body.data["notes"], "called twice");
        let emails = body.data["emails"].as_array().unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0], "new@test.local");
    }

    #[tokio::test]
    async fn test_move_lead_between_stages() {
        let server = setup_server().await;
        seed(&server).await;

        let create = server
            .post("/api/v1/leads")
            .json(&lead_request("Mover"))
            .await;
        create.assert_status(StatusCode::CREATED);
        let created: ApiResponse<serde_json::Value> = create.json();
        let lead_id = created.data["id"].as_i64().unwrap();

        let stages = server.get("/api/v1/pipeline/stages").await;
        let stages_body: ApiResponse<serde_json::Value> = stages.json();
        let second_stage = stages_body.data.as_array().unwrap()[1]["id"]
            .as_i64()
            .unwrap() as i32;

        let response = server
            .put(&format!("/api/v1/leads/{}/status", lead_id))
            .json(&MoveLeadStatusRequest {
                status_id: second_stage,
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["status_id"].as_i64().unwrap() as i32, second_stage);

        // Unknown stage is rejected before the lead is touched
        let bad = server
            .put(&format!("/api/v1/leads/{}/status", lead_id))
            .json(&MoveLeadStatusRequest { status_id: 9999 })
            .await;
        bad.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_set_and_clear_lead_assignee() {
        let server = setup_server().await;
        seed(&server).await;

        let sp = server
            .post("/api/v1/sales-persons")
            .json(&CreateSalesPersonRequest {
                name: "Owner".to_string(),
                email: "owner@test.local".to_string(),
                phone: "9876543210".to_string(),
                password: "pass".to_string(),
            })
            .await;
        sp.assert_status(StatusCode::CREATED);
        let sp_body: ApiResponse<serde_json::Value> = sp.json();
        let sp_id = sp_body.data["id"].as_i64().unwrap() as i32;

        let create = server
            .post("/api/v1/leads")
            .json(&lead_request("Assignable"))
            .await;
        let created: ApiResponse<serde_json::Value> = create.json();
        let lead_id = created.data["id"].as_i64().unwrap();

        let assign = server
            .put(&format!("/api/v1/leads/{}/assignee", lead_id))
            .json(&SetLeadAssigneeRequest {
                sales_person_id: Some(sp_id),
            })
            .await;
        assign.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = assign.json();
        assert_eq!(body.data["assigned_to"].as_i64().unwrap() as i32, sp_id);

        let clear = server
            .put(&format!("/api/v1/leads/{}/assignee", lead_id))
            .json(&SetLeadAssigneeRequest {
                sales_person_id: None,
            })
            .await;
        clear.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = clear.json();
        assert!(body.data["assigned_to"].is_null());
    }

    #[tokio::test]
    async fn test_auto_assign_balances_leads() {
        let server = setup_server().await;
        seed(&server).await;

        for i in 0..2 {
            let response = server
                .post("/api/v1/sales-persons")
                .json(&CreateSalesPersonRequest {
                    name: format!("Rep {}", i),
                    email: format!("rep{}@test.local", i),
                    phone: "9876543210".to_string(),
                    password: "pass".to_string(),
                })
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        for i in 0..5 {
            let response = server
                .post("/api/v1/leads")
                .json(&lead_request(&format!("Lead {}", i)))
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let response = server.post("/api/v1/leads/auto-assign").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["assigned"].as_array().unwrap().len(), 5);
        assert_eq!(body.data["sales_person_count"].as_i64().unwrap(), 2);
        assert_eq!(body.data["unassigned_before"].as_i64().unwrap(), 5);

        // Per-person counts differ by at most one and nothing is left over
        let leads = server.get("/api/v1/leads").await;
        let leads_body: ApiResponse<serde_json::Value> = leads.json();
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for lead in leads_body.data.as_array().unwrap() {
            let assignee = lead["assigned_to"]
                .as_i64()
                .expect("every lead should be assigned");
            *counts.entry(assignee).or_default() += 1;
        }
        let max = counts.values().max().copied().unwrap();
        let min = counts.values().min().copied().unwrap();
        assert!(max - min <= 1, "counts {:?} spread more than 1", counts);
    }

    #[tokio::test]
    async fn test_auto_assign_without_sales_persons_conflicts() {
        let server = setup_server().await;
        seed(&server).await;

        let create = server
            .post("/api/v1/leads")
            .json(&lead_request("Orphan"))
            .await;
        create.assert_status(StatusCode::CREATED);

        let response = server.post("/api/v1/leads/auto-assign").await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_board_groups_leads_and_tracks_changes() {
        let server = setup_server().await;
        seed(&server).await;

        let first = server.get("/api/v1/pipeline/board").await;
        first.assert_status(StatusCode::OK);
        let first_body: ApiResponse<serde_json::Value> = first.json();
        assert_eq!(first_body.data["total_leads"].as_i64().unwrap(), 0);
        assert_eq!(first_body.data["stages"].as_array().unwrap().len(), 6);

        let create = server
            .post("/api/v1/leads")
            .json(&lead_request("Board lead"))
            .await;
        create.assert_status(StatusCode::CREATED);

        // The cached board was invalidated by the lead write
        let second = server.get("/api/v1/pipeline/board").await;
        second.assert_status(StatusCode::OK);
        let second_body: ApiResponse<serde_json::Value> = second.json();
        assert_eq!(second_body.data["total_leads"].as_i64().unwrap(), 1);
        let first_column = &second_body.data["stages"].as_array().unwrap()[0];
        assert_eq!(first_column["lead_count"].as_i64().unwrap(), 1);
        assert_eq!(first_column["leads"][0]["name"], "Board lead");
    }

    #[tokio::test]
    async fn test_delete_stage_with_leads_conflicts() {
        let server = setup_server().await;
        seed(&server).await;

        let create = server
            .post("/api/v1/leads")
            .json(&lead_request("Blocker"))
            .await;
        create.assert_status(StatusCode::CREATED);
        let created: ApiResponse<serde_json::Value> = create.json();
        let stage_id = created.data["status_id"].as_i64().unwrap();

        let response = server
            .delete(&format!("/api/v1/pipeline/stages/{}", stage_id))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_and_delete_empty_stage() {
        let server = setup_server().await;

        let create = server
            .post("/api/v1/pipeline/stages")
            .json(&CreateStageRequest {
                name: "On Hold".to_string(),
                sort_order: 10,
                color: "#64748B".to_string(),
            })
            .await;
        create.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = create.json();
        let stage_id = body.data["id"].as_i64().unwrap();

        let duplicate = server
            .post("/api/v1/pipeline/stages")
            .json(&CreateStageRequest {
                name: "On Hold".to_string(),
                sort_order: 11,
                color: "#64748B".to_string(),
            })
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);

        let delete = server
            .delete(&format!("/api/v1/pipeline/stages/{}", stage_id))
            .await;
        delete.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rename_stage_to_existing_name_conflicts() {
        let server = setup_server().await;
        seed(&server).await;

        let stages = server.get("/api/v1/pipeline/stages").await;
        let stages_body: ApiResponse<serde_json::Value> = stages.json();
        let columns = stages_body.data.as_array().unwrap().clone();
        let first_name = columns[0]["name"].as_str().unwrap().to_string();
        let second_id = columns[1]["id"].as_i64().unwrap();

        let response = server
            .put(&format!("/api/v1/pipeline/stages/{}", second_id))
            .json(&UpdateStageRequest {
                name: Some(first_name.clone()),
                sort_order: None,
                color: None,
            })
            .await;
        response.assert_status(StatusCode::CONFLICT);

        // Re-submitting a stage's own name is not a conflict.
        let own_name = server
            .put(&format!("/api/v1/pipeline/stages/{}", second_id))
            .json(&UpdateStageRequest {
                name: Some(columns[1]["name"].as_str().unwrap().to_string()),
                sort_order: None,
                color: None,
            })
            .await;
        own_name.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ensure_default_packages_is_idempotent() {
        let server = setup_server().await;

        let first = server.post("/api/v1/packages/ensure-defaults").await;
        first.assert_status(StatusCode::OK);
        let first_body: ApiResponse<serde_json::Value> = first.json();
        assert_eq!(first_body.data.as_i64().unwrap(), 3);

        let second = server.post("/api/v1/packages/ensure-defaults").await;
        second.assert_status(StatusCode::OK);
        let second_body: ApiResponse<serde_json::Value> = second.json();
        assert_eq!(second_body.data.as_i64().unwrap(), 0);

        let packages = server.get("/api/v1/packages").await;
        let packages_body: ApiResponse<serde_json::Value> = packages.json();
        let names: Vec<&str> = packages_body
            .data
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Starter", "Growth", "Enterprise"]);
    }

    #[tokio::test]
    async fn test_create_package_with_features() {
        let server = setup_server().await;

        let response = server
            .post("/api/v1/packages")
            .json(&CreatePackageRequest {
                name: "Custom".to_string(),
                price: Decimal::new(1_234_50, 2),
                description: Some("Bespoke engagement".to_string()),
                is_active: None,
                features: vec![
                    "Dedicated manager".to_string(),
                    "Weekly reports".to_string(),
                ],
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["price"], "1234.50");
        assert_eq!(body.data["features"].as_array().unwrap().len(), 2);
        assert_eq!(body.data["is_active"], true);
    }

    #[tokio::test]
    async fn test_create_invoice_derives_totals() {
        let server = setup_server().await;
        seed(&server).await;

        // Seeded Starter package costs 4999.00
        let packages = server.get("/api/v1/packages").await;
        let packages_body: ApiResponse<serde_json::Value> = packages.json();
        let starter = &packages_body.data.as_array().unwrap()[0];
        assert_eq!(starter["name"], "Starter");
        let package_id = starter["id"].as_i64().unwrap() as i32;

        let users = server.get("/api/v1/users").await;
        let users_body: ApiResponse<serde_json::Value> = users.json();
        let admin_id = users_body.data.as_array().unwrap()[0]["id"]
            .as_i64()
            .unwrap() as i32;

        let response = server
            .post("/api/v1/invoices")
            .json(&CreateInvoiceRequest {
                customer_name: "Acme Corp".to_string(),
                customer_email: "billing@acme.test".to_string(),
                customer_phone: "9876543210".to_string(),
                customer_address: None,
                package_id,
                gst_percentage: Decimal::new(18, 0),
                notes: None,
                created_by: admin_id,
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["base_price"], "4999.00");
        assert_eq!(body.data["gst_amount"], "899.82");
        assert_eq!(body.data["total_amount"], "5898.82");
        let number = body.data["invoice_number"].as_str().unwrap();
        assert!(number.starts_with("INV-"));
        assert!(number.ends_with("-0001"));

        // Second invoice the same day takes the next sequence number
        let second = server
            .post("/api/v1/invoices")
            .json(&CreateInvoiceRequest {
                customer_name: "Beta Ltd".to_string(),
                customer_email: "billing@beta.test".to_string(),
                customer_phone: "9123456780".to_string(),
                customer_address: None,
                package_id,
                gst_percentage: Decimal::new(18, 0),
                notes: None,
                created_by: admin_id,
            })
            .await;
        second.assert_status(StatusCode::CREATED);
        let second_body: ApiResponse<serde_json::Value> = second.json();
        assert!(second_body.data["invoice_number"]
            .as_str()
            .unwrap()
            .ends_with("-0002"));
    }

    #[tokio::test]
    async fn test_create_invoice_unknown_package_not_found() {
        let server = setup_server().await;
        seed(&server).await;

        let response = server
            .post("/api/v1/invoices")
            .json(&CreateInvoiceRequest {
                customer_name: "Nobody".to_string(),
                customer_email: "nobody@test.local".to_string(),
                customer_phone: "9876543210".to_string(),
                customer_address: None,
                package_id: 9999,
                gst_percentage: Decimal::new(18, 0),
                notes: None,
                created_by: 1,
            })
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_package_referenced_by_invoice_conflicts() {
        let server = setup_server().await;
        seed(&server).await;

        let packages = server.get("/api/v1/packages").await;
        let packages_body: ApiResponse<serde_json::Value> = packages.json();
        let package_id = packages_body.data.as_array().unwrap()[0]["id"]
            .as_i64()
            .unwrap() as i32;

        let invoice = server
            .post("/api/v1/invoices")
            .json(&CreateInvoiceRequest {
                customer_name: "Keeper".to_string(),
                customer_email: "keeper@test.local".to_string(),
                customer_phone: "9876543210".to_string(),
                customer_address: None,
                package_id,
                gst_percentage: Decimal::new(18, 0),
                notes: None,
                created_by: 1,
            })
            .await;
        invoice.assert_status(StatusCode::CREATED);

        let response = server
            .delete(&format!("/api/v1/packages/{}", package_id))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let server = setup_server().await;

        let first = server.post("/api/v1/seed").await;
        first.assert_status(StatusCode::OK);
        let first_body: ApiResponse<serde_json::Value> = first.json();
        assert_eq!(first_body.data["admin_created"], true);
        assert_eq!(first_body.data["stages_created"].as_i64().unwrap(), 6);
        assert_eq!(first_body.data["packages_created"].as_i64().unwrap(), 3);

        let second = server.post("/api/v1/seed").await;
        second.assert_status(StatusCode::OK);
        let second_body: ApiResponse<serde_json::Value> = second.json();
        assert_eq!(second_body.data["admin_created"], false);
        assert_eq!(second_body.data["stages_created"].as_i64().unwrap(), 0);
        assert_eq!(second_body.data["packages_created"].as_i64().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deactivated_sales_person_skipped_by_auto_assign() {
        let server = setup_server().await;
        seed(&server).await;

        let active = server
            .post("/api/v1/sales-persons")
            .json(&CreateSalesPersonRequest {
                name: "Active Rep".to_string(),
                email: "active@test.local".to_string(),
                phone: "9876543210".to_string(),
                password: "pass".to_string(),
            })
            .await;
        active.assert_status(StatusCode::CREATED);
        let active_body: ApiResponse<serde_json::Value> = active.json();
        let active_id = active_body.data["id"].as_i64().unwrap() as i32;

        let benched = server
            .post("/api/v1/sales-persons")
            .json(&CreateSalesPersonRequest {
                name: "Benched Rep".to_string(),
                email: "benched@test.local".to_string(),
                phone: "9123456780".to_string(),
                password: "pass".to_string(),
            })
            .await;
        benched.assert_status(StatusCode::CREATED);
        let benched_body: ApiResponse<serde_json::Value> = benched.json();
        let benched_id = benched_body.data["id"].as_i64().unwrap();

        let deactivate = server
            .put(&format!("/api/v1/sales-persons/{}", benched_id))
            .json(&UpdateSalesPersonRequest {
                name: None,
                email: None,
                phone: None,
                status: Some("inactive".to_string()),
            })
            .await;
        deactivate.assert_status(StatusCode::OK);

        for i in 0..3 {
            let response = server
                .post("/api/v1/leads")
                .json(&lead_request(&format!("Lead {}", i)))
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let response = server.post("/api/v1/leads/auto-assign").await;
        response.assert_status(StatusCode::OK);

        let leads = server.get("/api/v1/leads").await;
        let leads_body: ApiResponse<serde_json::Value> = leads.json();
        for lead in leads_body.data.as_array().unwrap() {
            assert_eq!(lead["assigned_to"].as_i64().unwrap() as i32, active_id);
        }
    }
}

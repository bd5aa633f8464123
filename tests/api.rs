use job_board::build_rocket;
use job_board::core::ServerSettings;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::{Client, LocalResponse};
use serde_json::{json, Value};

const BOUNDARY: &str = "X-JOB-BOARD-BOUNDARY";

async fn client() -> Client {
    Client::tracked(build_rocket(ServerSettings::instant()))
        .await
        .expect("valid rocket instance")
}

async fn body(response: LocalResponse<'_>) -> Value {
    let text = response.into_string().await.expect("response body");
    serde_json::from_str(&text).expect("JSON body")
}

fn ids(results: &Value) -> Vec<u64> {
    results["jobs"]
        .as_array()
        .expect("jobs array")
        .iter()
        .map(|job| job["id"].as_u64().expect("numeric id"))
        .collect()
}

fn multipart(fields: &[(&str, &str)], resume: Option<(&str, &str, &[u8])>) -> (ContentType, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = resume {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let content_type =
        ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY));
    (content_type, body)
}

const PERSONAL: [(&str, &str); 4] = [
    ("firstName", "Dana"),
    ("lastName", "Kowalski"),
    ("email", "dana@example.com"),
    ("phone", "(216) 555-0142"),
];

#[rocket::async_test]
async fn search_matches_title_text() {
    let client = client().await;
    let response = client.get("/api/jobs?search=cnc").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let json = body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(ids(&json["data"]), vec![1]);
}

#[rocket::async_test]
async fn search_keeps_query_whitespace() {
    let client = client().await;

    let padded = body(client.get("/api/jobs?search=%20operator").dispatch().await).await;
    assert_eq!(ids(&padded["data"]), vec![1, 6, 7]);

    let blank = body(client.get("/api/jobs?search=%20%20").dispatch().await).await;
    assert_eq!(blank["data"]["total"], 0);
}

#[rocket::async_test]
async fn generic_filter_parameter() {
    let client = client().await;
    let json = body(
        client
            .get("/api/jobs?filter=industries:Automation&filter=jobTypes:Contract")
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(ids(&json["data"]), vec![12]);

    let response = client.get("/api/jobs?filter=salary:high").dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["error_code"], "INVALID_FILTER");
}

#[rocket::async_test]
async fn industry_facet_sorted_newest_first() {
    let client = client().await;
    let json = body(client.get("/api/jobs?industries=Automation").dispatch().await).await;

    assert_eq!(ids(&json["data"]), vec![5, 12, 10]);
    assert_eq!(json["data"]["activeFilters"][0]["value"], "Automation");
}

#[rocket::async_test]
async fn out_of_range_page_is_clamped() {
    let client = client().await;
    let json = body(client.get("/api/jobs?page=99").dispatch().await).await;

    assert_eq!(json["data"]["page"], 2);
    assert_eq!(json["data"]["totalPages"], 2);
    assert_eq!(json["data"]["hasNext"], false);
    assert_eq!(json["data"]["jobs"].as_array().map(Vec::len), Some(2));
}

#[rocket::async_test]
async fn unknown_sort_is_a_bad_request() {
    let client = client().await;
    let response = client.get("/api/jobs?sort=random").dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);

    let json = body(response).await;
    assert_eq!(json["error_code"], "INVALID_SORT");
}

#[rocket::async_test]
async fn detail_includes_similar_jobs() {
    let client = client().await;
    let response = client.get("/api/jobs/5").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let json = body(response).await;
    assert_eq!(json["data"]["job"]["title"], "Automation Technician");
    let similar: Vec<u64> = json["data"]["similarJobs"]
        .as_array()
        .expect("similar jobs")
        .iter()
        .filter_map(|job| job["id"].as_u64())
        .collect();
    assert_eq!(similar, vec![2, 8, 10]);
}

#[rocket::async_test]
async fn detail_tab_selects_section() {
    let client = client().await;

    let default = body(client.get("/api/jobs/2").dispatch().await).await;
    assert_eq!(default["data"]["tab"], "description");

    let benefits = body(client.get("/api/jobs/2?tab=benefits").dispatch().await).await;
    assert_eq!(benefits["data"]["tab"], "benefits");
    assert!(benefits["data"]["content"].is_array());
    assert_eq!(benefits["data"]["job"]["id"], 2);

    let response = client.get("/api/jobs/2?tab=salary").dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["error_code"], "INVALID_TAB");
}

#[rocket::async_test]
async fn missing_and_malformed_ids_are_not_found() {
    let client = client().await;
    for path in ["/api/jobs/999", "/api/jobs/abc", "/api/jobs/12abc/share"] {
        let response = client.get(path).dispatch().await;
        assert_eq!(response.status(), Status::NotFound, "{}", path);
        let json = body(response).await;
        assert_eq!(json["error_code"], "JOB_NOT_FOUND");
    }
}

#[rocket::async_test]
async fn facets_count_every_posting() {
    let client = client().await;
    let json = body(client.get("/api/jobs/facets").dispatch().await).await;

    let total: u64 = json["data"]["jobTypes"]
        .as_array()
        .expect("job type facets")
        .iter()
        .filter_map(|facet| facet["count"].as_u64())
        .sum();
    assert_eq!(total, 12);
}

#[rocket::async_test]
async fn step_validation_reports_field_errors() {
    let client = client().await;
    let response = client
        .post("/api/applications/validate")
        .json(&json!({
            "jobId": 1,
            "step": 1,
            "fields": {
                "firstName": "Dana",
                "lastName": "",
                "email": "dana.example.com",
                "phone": "555-0142"
            }
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let json = body(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["errors"]["lastName"]["kind"], "REQUIRED");
    assert_eq!(json["data"]["errors"]["email"]["kind"], "INVALID_EMAIL");
    assert!(json["data"]["errors"].get("firstName").is_none());
}

#[rocket::async_test]
async fn valid_step_points_to_the_next_one() {
    let client = client().await;
    let json = body(
        client
            .post("/api/applications/validate")
            .json(&json!({
                "step": 1,
                "fields": {
                    "firstName": "Dana",
                    "lastName": "Kowalski",
                    "email": "dana@example.com",
                    "phone": "555-0142"
                }
            }))
            .dispatch()
            .await,
    )
    .await;

    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["nextStep"], 2);
}

#[rocket::async_test]
async fn step_validation_for_unknown_job_is_not_found() {
    let client = client().await;
    let response = client
        .post("/api/applications/validate")
        .json(&json!({ "jobId": 999, "step": 1 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn job_application_returns_receipt() {
    let client = client().await;
    let mut fields = PERSONAL.to_vec();
    fields.push(("coverLetter", "Ten years on Haas mills."));
    fields.push(("consent", "true"));
    let (content_type, data) = multipart(
        &fields,
        Some(("resume.pdf", "application/pdf", &b"%PDF-1.4 resume"[..])),
    );

    let response = client
        .post("/api/applications/jobs/1")
        .header(content_type)
        .body(data)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let json = body(response).await;
    assert_eq!(json["data"]["kind"], "jobApplication");
    assert_eq!(json["data"]["jobId"], 1);
    assert!(json["data"]["reference"].as_str().is_some());
}

#[rocket::async_test]
async fn application_without_consent_is_rejected() {
    let client = client().await;
    let (content_type, data) = multipart(
        &PERSONAL,
        Some(("resume.pdf", "application/pdf", &b"%PDF-1.4 resume"[..])),
    );

    let response = client
        .post("/api/applications/jobs/1")
        .header(content_type)
        .body(data)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);

    let json = body(response).await;
    assert_eq!(json["error_code"], "VALIDATION_ERROR");
    assert_eq!(json["field_errors"]["consent"]["kind"], "CONSENT_REQUIRED");
}

#[rocket::async_test]
async fn general_application_rejects_wrong_file_type() {
    let client = client().await;
    let mut fields = PERSONAL.to_vec();
    fields.push(("desiredRole", "Maintenance Technician"));
    fields.push(("preferredIndustry", "Automotive"));
    fields.push(("consent", "true"));
    let (content_type, data) =
        multipart(&fields, Some(("photo.png", "image/png", &b"\x89PNG fake"[..])));

    let response = client
        .post("/api/applications/general")
        .header(content_type)
        .body(data)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);

    let json = body(response).await;
    assert_eq!(json["field_errors"]["resume"]["kind"], "FILE_TYPE");
}

async fn apply_with_resume_of(client: &Client, size: usize) -> Value {
    let mut fields = PERSONAL.to_vec();
    fields.push(("consent", "true"));
    let resume = vec![b'x'; size];
    let (content_type, data) =
        multipart(&fields, Some(("resume.pdf", "application/pdf", &resume[..])));

    let response = client
        .post("/api/applications/jobs/1")
        .header(content_type)
        .body(data)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
    body(response).await
}

#[rocket::async_test]
async fn oversized_resume_is_a_field_error() {
    let client = client().await;

    // Over the 5MB rule but under the upload limit.
    let json = apply_with_resume_of(&client, 6 * 1024 * 1024).await;
    assert_eq!(json["field_errors"]["resume"]["kind"], "FILE_TOO_LARGE");

    // Cut off by the upload limit itself.
    let json = apply_with_resume_of(&client, 9 * 1024 * 1024).await;
    assert_eq!(json["field_errors"]["resume"]["kind"], "FILE_TOO_LARGE");
}

#[rocket::async_test]
async fn application_for_unknown_job_is_not_found() {
    let client = client().await;
    let (content_type, data) = multipart(&PERSONAL, None);
    let response = client
        .post("/api/applications/jobs/404")
        .header(content_type)
        .body(data)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn consent_is_remembered_between_requests() {
    let client = client().await;

    let first = body(client.get("/api/consent").dispatch().await).await;
    assert_eq!(first["data"]["showBanner"], true);
    assert!(first["data"]["consent"].is_null());

    let saved = body(
        client
            .post("/api/consent")
            .json(&json!({ "choice": "custom", "analytics": true }))
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(saved["data"]["essential"], true);
    assert_eq!(saved["data"]["analytics"], true);
    assert_eq!(saved["data"]["marketing"], false);

    let second = body(client.get("/api/consent").dispatch().await).await;
    assert_eq!(second["data"]["showBanner"], false);
    assert_eq!(second["data"]["consent"]["analytics"], true);
}

#[rocket::async_test]
async fn routes_resolve_to_pages() {
    let client = client().await;

    let detail = body(
        client
            .get("/api/routes/resolve?path=%2Fjobs%2F7")
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(detail["data"]["page"], "jobDetail");
    assert_eq!(detail["data"]["id"], 7);

    let missing = body(
        client
            .get("/api/routes/resolve?path=%2Fcareers")
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(missing["data"]["page"], "notFound");

    let map = body(client.get("/api/routes").dispatch().await).await;
    assert_eq!(map["data"]["navigation"][0]["path"], "/");
}

#[rocket::async_test]
async fn share_and_contact_links() {
    let client = client().await;

    let share = body(client.get("/api/jobs/1/share").dispatch().await).await;
    assert_eq!(share["data"]["pageUrl"], "http://localhost:3000/jobs/1");
    assert!(share["data"]["linkedin"]
        .as_str()
        .is_some_and(|url| url.ends_with("http%3A%2F%2Flocalhost%3A3000%2Fjobs%2F1")));

    let contact = body(client.get("/api/contact").dispatch().await).await;
    assert!(contact["data"]["mailto"]
        .as_str()
        .is_some_and(|link| link.starts_with("mailto:")));
    assert!(contact["data"]["tel"]
        .as_str()
        .is_some_and(|link| link.starts_with("tel:")));
}

#[rocket::async_test]
async fn health_check() {
    let client = client().await;
    let response = client.get("/api/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(body(response).await["message"], "OK");
}

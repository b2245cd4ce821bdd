use axum::Json;
use axum::Router;
use axum::routing::post;
use chrono::NaiveDate;

use registry_client::CreateDocumentRequest;
use registry_client::CreateDocumentResponse;
use registry_client::Description;
use registry_client::Product;

/// A local stand-in for the registry's document creation endpoint.
pub fn registry() -> Router {
    Router::new().route("/documents/create", post(create_document))
}

async fn create_document(
    Json(_request): Json<CreateDocumentRequest>,
) -> Json<CreateDocumentResponse> {
    Json(CreateDocumentResponse {
        response: "some response".to_string(),
    })
}

/// Serves `router` on an ephemeral local port and returns its base url.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

pub fn sample_document() -> CreateDocumentRequest {
    let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    CreateDocumentRequest {
        description: Description {
            participant_inn: "participantInn".to_string(),
        },
        doc_id: String::new(),
        doc_status: String::new(),
        doc_type: String::new(),
        import_request: true,
        owner_inn: String::new(),
        participant_inn: String::new(),
        producer_inn: String::new(),
        production_date: today,
        production_type: String::new(),
        products: vec![Product {
            certificate_document: String::new(),
            certificate_document_date: today,
            certificate_document_number: String::new(),
            owner_inn: String::new(),
            producer_inn: String::new(),
            production_date: today,
            tnved_code: String::new(),
            uit_code: String::new(),
            uitu_cod: String::new(),
        }],
        reg_date: today,
        reg_number: String::new(),
    }
}

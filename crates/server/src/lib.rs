use api_types::envelope::ApiError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;
use ocr::OcrError;

pub use server::{ServerState, router, run, run_with_listener};

mod dashboard;
mod expenses;
mod health;
mod receipts;
mod server;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            Expense, ExpenseList, ExpenseListResponse, ExpenseNew, ExpenseUpdate,
        };
    }

    pub mod dashboard {
        pub use engine::{
            CategorySpending, DailyTrend, Dashboard, Kpi, Kpis, MonthlyByType, MonthlySpending,
        };
    }

    pub mod ocr {
        pub use api_types::ocr::OcrText;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Ocr(OcrError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Store(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Store(store_err) => {
            tracing::error!("{store_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn status_for_ocr_error(err: &OcrError) -> StatusCode {
    match err {
        OcrError::NotConfigured | OcrError::InvalidEndpoint(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        OcrError::Transport(_) | OcrError::Status(_) | OcrError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Ocr(err) => {
                let status = status_for_ocr_error(&err);
                if status == StatusCode::BAD_GATEWAY {
                    tracing::warn!("OCR request failed: {err}");
                }
                (status, err.to_string())
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ApiError::new(error))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<OcrError> for ServerError {
    fn from(value: OcrError) -> Self {
        Self::Ocr(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        match value {
            JsonRejection::JsonDataError(err) => Self::Generic(err.body_text()),
            _ => Self::Generic("JSON body required".to_string()),
        }
    }
}

// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_me,

        // --- Subscription ---
        handlers::subscription::list_plans,
        handlers::subscription::get_status,
        handlers::subscription::change_plan,

        // --- Shifts ---
        handlers::shifts::list_shifts,
        handlers::shifts::create_shift,
        handlers::shifts::update_shift,
        handlers::shifts::delete_shift,
        handlers::shifts::duplicate_shift,

        // --- Institutions ---
        handlers::institutions::list_institutions,
        handlers::institutions::create_institution,
        handlers::institutions::update_institution,
        handlers::institutions::delete_institution,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::AuthResponse,

            // --- Shifts ---
            models::shifts::PaymentStatus,
            models::shifts::PaymentMethod,
            models::shifts::Shift,
            models::shifts::ShiftView,
            models::shifts::RepeatRule,
            models::shifts::RepeatPayload,
            models::shifts::ShiftPayload,

            // --- Institutions ---
            models::institutions::Institution,
            models::institutions::InstitutionPayload,

            // --- Subscription ---
            models::subscription::PlanType,
            models::subscription::SubscriptionStatus,
            models::subscription::Subscription,
            models::subscription::AccessStatus,
            models::subscription::ChangePlanPayload,
            models::subscription::PlanOffer,

            // --- Dashboard ---
            models::dashboard::Period,
            models::dashboard::FinancialSummary,
            models::dashboard::InstitutionEarnings,
            models::dashboard::MonthlyEntry,
            models::dashboard::StatusTotal,
            models::dashboard::DashboardReport,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Subscription", description = "Trial, Planos e Acesso"),
        (name = "Shifts", description = "Registro de Plantões"),
        (name = "Institutions", description = "Hospitais e Clínicas"),
        (name = "Dashboard", description = "Indicadores Financeiros da Carteira")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

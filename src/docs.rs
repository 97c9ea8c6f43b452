// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_my_profile,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_profile,
        handlers::users::update_access,
        handlers::users::set_active,
        handlers::users::delete_user,

        // --- Settings ---
        handlers::settings::list_hotels,
        handlers::settings::create_hotel,
        handlers::settings::update_hotel,
        handlers::settings::delete_hotel,
        handlers::settings::list_parameters,
        handlers::settings::create_parameter,
        handlers::settings::update_parameter,
        handlers::settings::list_modules,
        handlers::settings::list_roles,

        // --- Files ---
        handlers::files::download_file,

        // --- Incidents ---
        handlers::incidents::list_incidents,
        handlers::incidents::create_incident,
        handlers::incidents::get_incident,
        handlers::incidents::update_incident,
        handlers::incidents::delete_incident,
        handlers::incidents::upload_attachment,
        handlers::incidents::list_attachments,

        // --- Lost & Found ---
        handlers::lost_items::list_lost_items,
        handlers::lost_items::create_lost_item,
        handlers::lost_items::get_lost_item,
        handlers::lost_items::update_lost_item,
        handlers::lost_items::delete_lost_item,
        handlers::lost_items::upload_photo,

        // --- Maintenance ---
        handlers::technicians::list_technicians,
        handlers::technicians::create_technician,
        handlers::technicians::get_technician,
        handlers::technicians::update_technician,
        handlers::technicians::delete_technician,

        // --- Checklists ---
        handlers::checklists::list_missions,
        handlers::checklists::create_mission,
        handlers::checklists::update_mission,
        handlers::checklists::delete_mission,
        handlers::checklists::list_day_items,
        handlers::checklists::generate_items,
        handlers::checklists::toggle_item,
        handlers::checklists::duplicate_day,

        // --- Logbook ---
        handlers::logbook::list_entries,
        handlers::logbook::create_entry,
        handlers::logbook::delete_entry,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Events ---
        handlers::events::change_feed,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::RoleInfo,
            models::auth::User,
            models::auth::MeResponse,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::UpdateAccessPayload,
            models::auth::SetActivePayload,

            // --- Settings ---
            models::hotel::Hotel,
            models::hotel::HotelPayload,
            models::parameter::ParameterKind,
            models::parameter::Parameter,
            models::parameter::ParameterPayload,
            models::module::ModuleInfo,
            models::filters::DateRange,

            // --- Incidents ---
            models::incident::IncidentClient,
            models::incident::IncidentResolution,
            models::incident::Incident,
            models::incident::IncidentPayload,
            models::incident::AttachmentLink,

            // --- Lost & Found ---
            models::lost_item::LostItemStatus,
            models::lost_item::LostItem,
            models::lost_item::LostItemPayload,
            models::lost_item::LostItemDetail,

            // --- Maintenance ---
            models::technician::Technician,
            models::technician::TechnicianPayload,

            // --- Checklists ---
            models::checklist::ChecklistMission,
            models::checklist::MissionPayload,
            models::checklist::ChecklistItem,
            models::checklist::GenerateItemsPayload,
            models::checklist::ToggleItemPayload,
            models::checklist::DuplicateDayPayload,

            // --- Logbook ---
            models::logbook::LogbookEntry,
            models::logbook::LogbookPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Usuários, papéis e listas de acesso"),
        (name = "Settings", description = "Hotéis, parâmetros, módulos e papéis"),
        (name = "Files", description = "Download por URL assinada"),
        (name = "Incidents", description = "Ocorrências e anexos"),
        (name = "Lost & Found", description = "Achados e perdidos"),
        (name = "Maintenance", description = "Técnicos de manutenção"),
        (name = "Checklists", description = "Missões e checklists diários"),
        (name = "Logbook", description = "Diário de bordo"),
        (name = "Dashboard", description = "Indicadores operacionais"),
        (name = "Events", description = "Feed de alterações em tempo real")
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

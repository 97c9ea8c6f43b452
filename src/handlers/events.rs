// src/handlers/events.rs

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
};
use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{events::ChangeEvent, module::AppModule},
    services::{access::AccessScope, auth::AuthService},
};

// Intervalo para recarregar papel, hotéis e módulos do assinante
const SCOPE_REFRESH: Duration = Duration::from_secs(30);

/// Módulo dono de cada coleção. Hotéis e parâmetros alimentam todos os formulários.
fn collection_module(collection: &str) -> Option<AppModule> {
    match collection {
        "incidents" => Some(AppModule::Incidents),
        "lost_items" => Some(AppModule::LostFound),
        "technicians" => Some(AppModule::Maintenance),
        "checklist_items" | "checklist_missions" => Some(AppModule::Checklists),
        "logbook_entries" => Some(AppModule::Logbook),
        "users" => Some(AppModule::Users),
        _ => None,
    }
}

// Eventos globais (sem hotel) vão para todos; os demais só para quem acessa um dos hotéis
fn visible_to(scope: &AccessScope, event: &ChangeEvent) -> bool {
    let module_ok = collection_module(event.collection).is_none_or(|m| scope.can_access_module(m));
    let hotel_ok = event.hotel_ids.is_empty() || event.hotel_ids.iter().any(|h| scope.can_access_hotel(*h));
    module_ok && hotel_ok
}

/// Mantém o escopo atualizado; termina quando o usuário é desativado ou removido.
async fn follow_user(
    auth: AuthService,
    user_id: Uuid,
    scope_tx: watch::Sender<AccessScope>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match auth.load_active_user(user_id).await {
            Ok(user) => {
                scope_tx.send_replace(AccessScope::from_user(&user));
            }
            Err(AppError::UserInactive | AppError::UserNotFound) => {
                tracing::info!("📡 Feed encerrado, acesso revogado: {}", user_id);
                return;
            }
            Err(e) => tracing::warn!("⚠️ Falha ao recarregar assinante {}: {}", user_id, e),
        }
    }
}

// GET /api/events: feed de alterações (Server-Sent Events)
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses((status = 200, description = "Stream SSE de alterações", content_type = "text/event-stream")),
    security(("api_jwt" = []))
)]
pub async fn change_feed(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!("📡 Assinante do feed conectado: {}", user.id);

    let (scope_tx, scope_rx) = watch::channel(AccessScope::from_user(&user));
    let revoked = follow_user(app_state.auth_service.clone(), user.id, scope_tx, SCOPE_REFRESH);
    let rx = app_state.events.subscribe();

    // Receptores atrasados (Lagged) simplesmente pulam o que perderam
    let stream = BroadcastStream::new(rx)
        .filter_map(move |result| {
            let event = result.ok().filter(|event| visible_to(&scope_rx.borrow(), event));
            let message = event.and_then(|event| {
                let json = serde_json::to_string(&event).ok()?;
                Some(Ok(Event::default().event(event.collection).data(json)))
            });
            async move { message }
        })
        .take_until(revoked);

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{auth::Role, events::ChangeAction},
        services::access::tests::user_with,
    };
    use chrono::Utc;

    fn event(collection: &'static str, hotel_ids: Vec<Uuid>) -> ChangeEvent {
        ChangeEvent {
            collection,
            record_id: Uuid::new_v4(),
            hotel_ids,
            action: ChangeAction::Updated,
            at: Utc::now(),
        }
    }

    #[test]
    fn subscribers_only_see_their_hotels() {
        let h1 = Uuid::new_v4();
        let h2 = Uuid::new_v4();
        let scope = AccessScope::from_user(&user_with(Role::Standard, vec![h1], vec!["incidents"]));

        assert!(visible_to(&scope, &event("incidents", vec![h1])));
        assert!(visible_to(&scope, &event("incidents", vec![h2, h1])));
        assert!(!visible_to(&scope, &event("incidents", vec![h2])));
        assert!(visible_to(&scope, &event("parameters", vec![])));
    }

    #[test]
    fn subscribers_only_see_their_modules() {
        let h1 = Uuid::new_v4();
        let scope = AccessScope::from_user(&user_with(Role::Standard, vec![h1], vec!["incidents"]));

        assert!(!visible_to(&scope, &event("lost_items", vec![h1])));
        assert!(!visible_to(&scope, &event("logbook_entries", vec![h1])));
        assert!(!visible_to(&scope, &event("users", vec![h1])));
        assert!(visible_to(&scope, &event("hotels", vec![h1])));

        let admin = AccessScope::from_user(&user_with(Role::SystemAdmin, vec![], vec![]));
        assert!(visible_to(&admin, &event("lost_items", vec![h1])));
    }

    #[test]
    fn every_published_collection_has_a_known_owner() {
        for collection in [
            "incidents",
            "lost_items",
            "technicians",
            "checklist_items",
            "checklist_missions",
            "logbook_entries",
            "users",
        ] {
            assert!(collection_module(collection).is_some(), "{}", collection);
        }
        assert_eq!(collection_module("hotels"), None);
        assert_eq!(collection_module("parameters"), None);
    }

    #[tokio::test]
    async fn feed_stops_when_the_subscriber_is_deactivated() {
        let Some(pool) = crate::db::test_support::test_pool().await else { return };
        let user_id = crate::db::test_support::insert_user(&pool, false).await;
        let auth = AuthService::new(crate::db::UserRepository::new(pool), "segredo".into());
        let (scope_tx, _scope_rx) =
            watch::channel(AccessScope::from_user(&user_with(Role::Standard, vec![], vec![])));

        let following = follow_user(auth, user_id, scope_tx, Duration::from_millis(20));
        let finished = tokio::time::timeout(Duration::from_secs(5), following).await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn active_subscribers_get_their_current_access() {
        let Some(pool) = crate::db::test_support::test_pool().await else { return };
        let user_id = crate::db::test_support::insert_user(&pool, true).await;
        let auth = AuthService::new(crate::db::UserRepository::new(pool), "segredo".into());
        let stale = user_with(Role::SystemAdmin, vec![], vec![]);
        let (scope_tx, scope_rx) = watch::channel(AccessScope::from_user(&stale));

        let following = follow_user(auth, user_id, scope_tx, Duration::from_millis(20));
        let still_running = tokio::time::timeout(Duration::from_millis(300), following).await;

        assert!(still_running.is_err());
        let scope = scope_rx.borrow();
        assert_eq!(scope.user_id, user_id);
        assert_eq!(scope.role, Role::Standard);
    }
}

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// Helper de Auditoria
// ---
/// Abre uma transação e define `app.user_id`, lido pelo trigger
/// `set_updated_audit` para preencher `updated_by`. A variável morre com a transação.
pub(crate) async fn begin_audited_tx(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

//! Promote command - Grant the admin role from the command line.
//!
//! There is no HTTP route that hands out admin rights; the first admin
//! has to be created here.

use std::sync::Arc;

use crate::cli::args::PromoteArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, UserStore};
use crate::services::{UserManager, UserService};

/// Execute the promote command
pub async fn execute(args: PromoteArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let service = UserManager::new(Arc::new(UserStore::new(db.get_connection())));

    let user = service.promote(&args.email).await?;
    tracing::info!(user_id = %user.id, "Admin role granted to {}", user.email);

    Ok(())
}

// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! dotauth administration tool
//!
//! Creates and drops the schema, registers the service's own permissions and
//! bootstraps the first superuser.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotauth_api::Repositories;
use dotauth_api::config::Config;
use dotauth_api::models::User;
use dotauth_api::password;
use dotauth_common::catalog;
use dotauth_core::repository::NewUser;
use dotauth_core::schema;
use dotauth_core::store::PgDatabase;
use tracing::info;

#[derive(Parser)]
#[command(name = "dotauth")]
#[command(about = "dotauth - RBAC authority service administration")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every table
    Setup,
    /// Drop every table
    Teardown,
    /// Insert the service's own permissions
    RegisterPermissions,
    /// Create an active, confirmed superuser
    CreateSuperuser {
        /// Login name
        #[arg(long)]
        username: String,
        /// Plain text password, hashed before storage
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let db = PgDatabase::connect(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::Setup => {
            schema::setup(db.pool()).await.context("schema setup failed")?;
        }
        Commands::Teardown => {
            schema::teardown(db.pool()).await.context("schema teardown failed")?;
        }
        Commands::RegisterPermissions => {
            let permissions = catalog::all();
            let created = Repositories::postgres(db)
                .permissions
                .register(&permissions)
                .await
                .context("permission registration failed")?;
            info!(created, total = permissions.len(), "Permissions registered");
        }
        Commands::CreateSuperuser {
            username,
            password: plain,
            first_name,
            last_name,
        } => {
            let user = NewUser {
                username,
                password: password::hash(&plain)?,
                first_name,
                last_name,
                is_superuser: true,
                is_active: true,
                is_staff: true,
                is_confirmed: true,
            };
            let entity = Repositories::postgres(db)
                .users
                .insert(&user)
                .await
                .context("superuser creation failed")?;

            info!(user_id = entity.id, "Superuser created");
            println!("{}", serde_json::to_string_pretty(&User::from(entity))?);
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use std::time::Instant;
use user_directory::client::{
    self, view, DirectoryApi, DirectoryState, HttpDirectoryApi, UserForm, DEFAULT_API_URL,
};

#[derive(Parser)]
#[command(name = "directory", about = "Browse and edit the user directory")]
struct Cli {
    /// Base URL of the user API
    #[arg(long, env = "DIRECTORY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List users, optionally filtered by name, email or address
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: i32,
        #[arg(long)]
        address: String,
    },
    /// Update a user; omitted fields keep their current values
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Delete a user
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    let api = HttpDirectoryApi::new(cli.api_url);
    let mut state = DirectoryState::new();

    client::load(&api, &mut state).await;

    let ok = match cli.command {
        Command::List { search } => {
            state.query = search.unwrap_or_default();
            state.banner.is_none()
        }
        Command::Add {
            name,
            email,
            age,
            address,
        } => {
            let form = UserForm {
                name,
                email,
                age,
                address,
            };
            client::submit(&api, &mut state, &form).await
        }
        Command::Update {
            id,
            name,
            email,
            age,
            address,
        } => edit(&api, &mut state, &id, name, email, age, address).await,
        Command::Delete { id, yes } => {
            if yes {
                client::delete(&api, &mut state, &id).await
            } else {
                eprintln!("Refusing to delete {} without --yes", id);
                false
            }
        }
    };

    print!("{}", view::render(&state, Instant::now()));

    if !ok {
        std::process::exit(1);
    }
}

async fn edit(
    api: &dyn DirectoryApi,
    state: &mut DirectoryState,
    id: &str,
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
    address: Option<String>,
) -> bool {
    let Some(mut form) = client::begin_edit(state, id) else {
        eprintln!("No user with id {}", id);
        return false;
    };

    if let Some(name) = name {
        form.name = name;
    }
    if let Some(email) = email {
        form.email = email;
    }
    if let Some(age) = age {
        form.age = age;
    }
    if let Some(address) = address {
        form.address = address;
    }

    client::submit(api, state, &form).await
}

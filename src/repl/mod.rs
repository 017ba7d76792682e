//! Line-based terminal front end.
//!
//! Mirrors the web client's chat page: pick a project and an agent, then
//! every non-command line is sent as a chat turn whose reply streams in
//! token by token. Slash commands cover selection, history, and the simple
//! create operations.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::process::ExitCode;

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::{ApiClient, ClientConfig};
use crate::model::{
    AgentDraft, AgentId, ConversationId, Message, ProjectDraft, ProjectId, ProjectStatus,
    ProjectStatusMetadata, ProjectType, ProjectTypeMetadata,
};
use crate::session::{ChatController, RejectReason, SessionStore, TurnObserver, TurnOutcome};

/// Run the terminal client. Used by the `neuroline` binary.
///
/// # Returns
/// `ExitCode::SUCCESS` on clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    tracing::info!("NeuroLine client v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    tracing::info!("Backend endpoint: {}", config.base_url);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(run_repl(config)) {
        tracing::error!("Fatal: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Prints streamed fragments as they arrive.
///
/// The `agent> ` prefix is emitted lazily on the first fragment, so a turn
/// refused before streaming leaves no dangling reply line.
struct ChunkPrinter {
    started: bool,
}

impl ChunkPrinter {
    const fn new() -> Self {
        Self { started: false }
    }
}

impl TurnObserver for ChunkPrinter {
    fn on_conversation_assigned(&mut self, id: ConversationId) {
        tracing::debug!("conversation {id} assigned");
    }

    fn on_chunk(&mut self, text: &str) {
        if !self.started {
            self.started = true;
            print!("agent> ");
        }
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Main interactive loop.
async fn run_repl(config: ClientConfig) -> anyhow::Result<()> {
    let api = ApiClient::new(config).context("building API client")?;
    let controller = ChatController::new(api);
    let mut store = SessionStore::new();

    println!("NeuroLine — type /help for commands");
    autoselect(&controller, &mut store).await;
    print_status(&store);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            prompt();
            continue;
        }
        if line.starts_with('/') {
            if !handle_command(&controller, &mut store, line).await {
                break;
            }
        } else {
            send(&controller, &mut store, line).await;
        }
        prompt();
    }

    Ok(())
}

/// Mirror the web client: auto-select the first project and agent.
async fn autoselect(controller: &ChatController, store: &mut SessionStore) {
    match controller.api().list_projects().await {
        Ok(projects) => {
            if let Some(first) = projects.into_iter().next() {
                select_project(controller, store, first.id).await;
            }
        }
        Err(e) => tracing::warn!("could not list projects: {e}"),
    }
    match controller.api().list_agents().await {
        Ok(agents) => store.select_agent(agents.into_iter().next()),
        Err(e) => tracing::warn!("could not list agents: {e}"),
    }
}

/// Send one chat message and render the streamed reply.
async fn send(controller: &ChatController, store: &mut SessionStore, text: &str) {
    let mut printer = ChunkPrinter::new();
    let outcome = controller.send_message(store, text, &mut printer).await;
    if printer.started {
        println!();
    }
    match outcome {
        TurnOutcome::Completed { .. } | TurnOutcome::Superseded => {}
        TurnOutcome::Failed { error } => match error {
            Some(description) => println!("[turn failed: {description}]"),
            None => println!("[turn failed]"),
        },
        TurnOutcome::Rejected(reason) => println!("[not sent: {}]", reject_hint(reason)),
    }
}

/// One-line hint for a refused submission.
const fn reject_hint(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::EmptyMessage => "message is empty",
        RejectReason::NoProject => "select a project first",
        RejectReason::NoAgent => "select an agent first",
        RejectReason::StreamActive => "a reply is still streaming",
    }
}

/// Handle a slash command. Returns `false` to exit the loop.
async fn handle_command(controller: &ChatController, store: &mut SessionStore, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "/quit" | "/exit" => return false,
        "/help" => print_help(),
        "/status" => print_status(store),
        "/projects" => match controller.api().list_projects().await {
            Ok(projects) => {
                let types = controller
                    .api()
                    .project_type_metadata()
                    .await
                    .unwrap_or_default();
                let statuses = controller
                    .api()
                    .project_status_metadata()
                    .await
                    .unwrap_or_default();
                for p in &projects {
                    println!(
                        "  {}  {} [{}] ({})",
                        p.id,
                        p.name,
                        type_label(&types, p.project_type),
                        status_label(&statuses, p.status)
                    );
                }
            }
            Err(e) => println!("[error: {e}]"),
        },
        "/project" => match parse_id::<ProjectId>(&args) {
            Some(id) => select_project(controller, store, id).await,
            None => println!("usage: /project <id>"),
        },
        "/agents" => match controller.api().list_agents().await {
            Ok(agents) => {
                for a in &agents {
                    println!("  {}  {} ({})", a.id, a.name, a.base_model);
                }
            }
            Err(e) => println!("[error: {e}]"),
        },
        "/agent" => match parse_id::<AgentId>(&args) {
            Some(id) => match controller.api().get_agent(id).await {
                Ok(agent) => {
                    println!("agent: {}", agent.name);
                    store.select_agent(Some(agent));
                }
                Err(e) => println!("[error: {e}]"),
            },
            None => println!("usage: /agent <id>"),
        },
        "/conversations" => {
            for c in store.conversations() {
                println!(
                    "  {}  agent {}  {} messages  {}",
                    c.id,
                    c.agent_id,
                    c.messages.len(),
                    c.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        "/open" => match parse_id::<ConversationId>(&args) {
            Some(id) => open_conversation(controller, store, id).await,
            None => println!("usage: /open <id>"),
        },
        "/new" => {
            store.start_new_conversation();
            println!("new conversation — next message starts a fresh thread");
        }
        "/new-project" => create_project(controller, &args).await,
        "/new-agent" => create_agent(controller, &args).await,
        _ => println!("unknown command {command}; /help lists commands"),
    }
    true
}

/// Select a project by id and load its conversations.
async fn select_project(controller: &ChatController, store: &mut SessionStore, id: ProjectId) {
    let project = match controller.api().get_project(id).await {
        Ok(project) => project,
        Err(e) if e.is_not_found() => {
            println!("[no project with id {id}]");
            return;
        }
        Err(e) => {
            println!("[error: {e}]");
            return;
        }
    };
    println!("project: {}", project.name);
    store.select_project(Some(project));
    if let Err(e) = controller.api().touch_project(id).await {
        tracing::debug!("could not touch project {id}: {e}");
    }
    refresh_conversations(controller, store, id).await;
}

/// Reload the conversation list for a project.
async fn refresh_conversations(
    controller: &ChatController,
    store: &mut SessionStore,
    id: ProjectId,
) {
    match controller.api().list_conversations(id).await {
        Ok(conversations) => store.set_conversations(conversations),
        Err(e) => tracing::warn!("could not list conversations: {e}"),
    }
}

/// Open a conversation from the local list and print its history.
async fn open_conversation(
    controller: &ChatController,
    store: &mut SessionStore,
    id: ConversationId,
) {
    // The local list can be stale; refresh it before giving up.
    if !store.open_local_conversation(id) {
        if let Some(project_id) = store.project().map(|p| p.id) {
            refresh_conversations(controller, store, project_id).await;
        }
        if !store.open_local_conversation(id) {
            println!("[no conversation with id {id} in this project]");
            return;
        }
    }
    // The embedded copy may lag behind; prefer the authoritative list.
    match controller.api().list_messages(id).await {
        Ok(messages) => store.replace_messages(messages),
        Err(e) => tracing::debug!("could not refresh messages for {id}: {e}"),
    }
    for message in store.messages() {
        render_message(message);
    }
}

/// Create a project from `/new-project <name> [type]`.
async fn create_project(controller: &ChatController, args: &[&str]) {
    let Some(name) = args.first() else {
        println!("usage: /new-project <name> [type]");
        return;
    };
    let mut draft = ProjectDraft::new(*name);
    if let Some(raw) = args.get(1) {
        match raw.parse::<ProjectType>() {
            Ok(project_type) => draft = draft.with_project_type(project_type),
            Err(unknown) => {
                println!("[unknown project type {unknown:?}]");
                return;
            }
        }
    }
    if let Err(e) = draft.validate() {
        println!("[invalid project: {e}]");
        return;
    }
    match controller.api().create_project(&draft).await {
        Ok(project) => println!("created project {} ({})", project.id, project.name),
        Err(e) => println!("[error: {e}]"),
    }
}

/// Create an agent from `/new-agent <name> <base_model>`.
async fn create_agent(controller: &ChatController, args: &[&str]) {
    let (Some(name), Some(base_model)) = (args.first(), args.get(1)) else {
        println!("usage: /new-agent <name> <base_model>");
        return;
    };
    let draft = AgentDraft::new(*name, *base_model);
    if let Err(e) = draft.validate() {
        println!("[invalid agent: {e}]");
        return;
    }
    match controller.api().create_agent(&draft).await {
        Ok(agent) => println!("created agent {} ({})", agent.id, agent.name),
        Err(e) => println!("[error: {e}]"),
    }
}

/// Parse the single id argument of a command.
fn parse_id<T: std::str::FromStr>(args: &[&str]) -> Option<T> {
    args.first().and_then(|raw| raw.parse().ok())
}

/// Display label for a project type, falling back to the wire form when the
/// metadata endpoint was unavailable.
fn type_label(map: &BTreeMap<ProjectType, ProjectTypeMetadata>, ty: ProjectType) -> &str {
    map.get(&ty).map_or(ty.as_str(), |meta| meta.label.as_str())
}

/// Display label for a project status, same fallback as [`type_label`].
fn status_label(map: &BTreeMap<ProjectStatus, ProjectStatusMetadata>, status: ProjectStatus) -> &str {
    map.get(&status)
        .map_or(status.as_str(), |meta| meta.label.as_str())
}

fn render_message(message: &Message) {
    match message.role {
        crate::model::MessageRole::User => println!("you> {}", message.content),
        crate::model::MessageRole::Assistant => println!("agent> {}", message.content),
    }
}

fn print_status(store: &SessionStore) {
    let project = store.project().map_or("none", |p| p.name.as_str());
    let agent = store.agent().map_or("none", |a| a.name.as_str());
    let conversation = store
        .conversation_id()
        .map_or_else(|| "new".to_string(), |id| id.to_string());
    println!("project: {project} | agent: {agent} | conversation: {conversation}");
}

fn print_help() {
    println!("commands:");
    println!("  /projects                 list projects");
    println!("  /project <id>             select a project");
    println!("  /agents                   list agents");
    println!("  /agent <id>               select an agent");
    println!("  /conversations            list this project's conversations");
    println!("  /open <id>                open a conversation");
    println!("  /new                      start a new conversation");
    println!("  /new-project <name> [ty]  create a project");
    println!("  /new-agent <name> <mdl>   create an agent");
    println!("  /status                   show current selections");
    println!("  /quit                     exit");
    println!("anything else is sent to the agent");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

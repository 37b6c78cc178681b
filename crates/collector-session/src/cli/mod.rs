/*
[INPUT]:  Parsed subcommand arguments
[OUTPUT]: One-shot settings, login, task list and logout commands
[POS]:    CLI layer - non-interactive subcommands and shared printing
[UPDATE]: When subcommands or their output change
*/

pub mod interactive;

use anyhow::{Result, anyhow};
use collector_adapter::Task;
use collector_session::{CollectorApp, ResolvedView, SettingsStore, worker_message};
use console::style;
use dialoguer::{Password, theme::ColorfulTheme};

pub async fn configure<S: SettingsStore>(
    app: &mut CollectorApp<S>,
    url: Option<String>,
    tenant: Option<String>,
) -> Result<()> {
    let status = app.tenant_status().await;
    if url.is_none() && tenant.is_none() {
        print_status(
            &status.service_url,
            &status.tenant_input,
            status.validated_code.as_deref(),
        );
        return Ok(());
    }

    let url = url.unwrap_or(status.service_url);
    let tenant = tenant.unwrap_or(status.tenant_input);
    let code = app
        .configure(&url, &tenant)
        .await
        .map_err(|err| anyhow!(worker_message(&err)))?;
    println!("{} {}", style("Tenant validado:").green(), style(code).bold());
    Ok(())
}

pub async fn login<S: SettingsStore>(
    app: &mut CollectorApp<S>,
    user: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Senha")
            .interact()?,
    };
    let view = app
        .login(user, &password)
        .await
        .map_err(|err| anyhow!(worker_message(&err)))?;
    print_view(&view);
    Ok(())
}

pub async fn list_tasks<S: SettingsStore>(app: &mut CollectorApp<S>) -> Result<()> {
    app.restore_session()
        .await
        .map_err(|err| anyhow!(worker_message(&err)))?;
    let tasks = app
        .refresh_list()
        .await
        .map_err(|err| anyhow!(worker_message(&err)))?;
    print_tasks(&tasks);
    Ok(())
}

pub async fn logout<S: SettingsStore>(app: &mut CollectorApp<S>) -> Result<()> {
    if app.restore_session().await.is_err() {
        println!("{}", style("Nenhum usuário logado.").yellow());
        return Ok(());
    }
    app.logout()
        .await
        .map_err(|err| anyhow!(worker_message(&err)))?;
    println!("{}", style("Sessão encerrada.").green());
    Ok(())
}

fn print_status(service_url: &str, tenant_input: &str, validated: Option<&str>) {
    let or_dash = |value: &str| if value.is_empty() { "-".to_string() } else { value.to_string() };
    println!("URL de serviços: {}", or_dash(service_url));
    println!("Tenant:          {}", or_dash(tenant_input));
    match validated {
        Some(code) => println!("Código validado: {}", style(code).green()),
        None => println!("Código validado: {}", style("não validado").yellow()),
    }
}

pub(crate) fn print_view(view: &ResolvedView) {
    match view {
        ResolvedView::ActiveSession(task) => {
            println!("{}", style("Tarefa em andamento").bold().cyan());
            print_task(task);
        }
        ResolvedView::ListOfTasks(tasks) => print_tasks(tasks),
    }
}

pub(crate) fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", style("Nenhuma tarefa disponível.").yellow());
        return;
    }
    for task in tasks {
        println!("{}", task_line(task));
    }
}

pub(crate) fn task_line(task: &Task) -> String {
    format!(
        "{} | {} | {} | {}",
        task.id, task.operation_name, task.description, task.status
    )
}

pub(crate) fn print_task(task: &Task) {
    println!("{} {}", style(format!("#{}", task.id)).bold(), task.operation_name);
    if !task.description.is_empty() {
        println!("  {}", task.description);
    }
    if !task.instruction.is_empty() {
        println!("  {}", style(&task.instruction).bold().cyan());
    }
    let fields = [
        ("Material", &task.next_material_hint),
        ("Restante", &task.remaining_qty),
        ("Origem", &task.source_position),
        ("Destino", &task.dest_position),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if let Some(volumes) = task.volumes_read {
        println!("  Volumes lidos: {volumes}");
    }
}

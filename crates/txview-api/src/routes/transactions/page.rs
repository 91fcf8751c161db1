//! Transactions page rendering - Full page and board fragments

use axum::{extract::State, response::Html};
use txview_core::{EmployeeOption, FetchStatus, ResolvedTransaction, ViewMode, ViewSnapshot};

use crate::{base_html, escape_html, AppState};

/// Review page: employee filter, transaction board, "View More"
pub async fn page_index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.coordinator.snapshot();

    let content = format!(
        r#"<main class='max-w-3xl mx-auto py-8 px-4'>
    <h1 class='text-2xl font-bold mb-6'>Transactions</h1>
    <div class='mb-6'>{}</div>
    <div id='board'>{}</div>
</main>"#,
        render_filter(&snapshot),
        render_board(&snapshot)
    );
    Html(base_html("Transactions", &content))
}

fn render_filter(snapshot: &ViewSnapshot) -> String {
    if snapshot.employees.is_empty() {
        let message = match &snapshot.employees_status {
            FetchStatus::Failed { reason } => format!("Employees unavailable: {}", escape_html(reason)),
            _ => "Loading employees...".to_string(),
        };
        return format!("<p class='text-sm text-gray-500'>{}</p>", message);
    }

    let selected = match &snapshot.mode {
        ViewMode::All => "",
        ViewMode::Filtered(id) => id.as_str(),
    };

    let options: String = snapshot
        .employees
        .iter()
        .map(|option| render_option(option, selected))
        .collect();

    format!(
        r#"<label class='block text-sm font-medium text-gray-600 mb-1' for='employee-filter'>Filter by employee</label>
<select id='employee-filter' name='employeeId' class='border rounded-lg px-3 py-2 w-full'
    hx-post='/transactions/filter' hx-trigger='change' hx-target='#board' hx-indicator='#board-indicator'>{}</select>"#,
        options
    )
}

fn render_option(option: &EmployeeOption, selected: &str) -> String {
    let marker = if option.value == selected { " selected" } else { "" };
    format!(
        "<option value='{}'{}>{}</option>",
        escape_html(&option.value),
        marker,
        escape_html(&option.label)
    )
}

/// Transaction rows plus the "View More" control
pub fn render_board(snapshot: &ViewSnapshot) -> String {
    let mut html = String::from(
        "<span id='board-indicator' class='htmx-indicator text-sm text-gray-400'>Loading...</span>",
    );

    if let FetchStatus::Failed { reason } = &snapshot.transactions_status {
        html.push_str(&format!(
            "<div class='bg-red-50 text-red-700 p-3 rounded-lg mb-4'>Could not load transactions: {}</div>",
            escape_html(reason)
        ));
    }

    match &snapshot.transactions {
        None => {
            if snapshot.transactions_loading {
                html.push_str("<div class='text-center py-12 text-gray-500'><p>Loading transactions...</p></div>");
            }
        }
        Some(list) if list.is_empty() => {
            html.push_str("<div class='text-center py-12 text-gray-500'><p>No transactions</p></div>");
        }
        Some(list) => {
            html.push_str("<div class='space-y-2'>");
            for transaction in list {
                html.push_str(&render_row(transaction));
            }
            html.push_str("</div>");
        }
    }

    if snapshot.load_more.visible {
        let disabled = if snapshot.load_more.enabled { "" } else { " disabled" };
        html.push_str(&format!(
            r#"<button class='mt-4 w-full py-2 rounded-lg bg-indigo-600 text-white disabled:opacity-50'
    hx-post='/transactions/more' hx-target='#board' hx-indicator='#board-indicator'{}>View More</button>"#,
            disabled
        ));
    }

    html
}

/// One transaction with its approval checkbox
pub fn render_row(resolved: &ResolvedTransaction) -> String {
    let tx = &resolved.transaction;
    let id = escape_html(tx.id.as_str());
    let state = if resolved.resolved_approved { " checked" } else { "" };

    format!(
        r#"<div id='tx-row-{id}' class='tx-row flex items-center gap-3 bg-white rounded-lg shadow-sm p-3'>
    <input type='checkbox' id='tx-approve-{id}' name='value' value='true'{state}
        hx-post='/transactions/{id}/approve' hx-trigger='change' hx-target='#tx-row-{id}' hx-swap='outerHTML'>
    <label for='tx-approve-{id}' class='flex-1'>
        <span class='font-medium'>{merchant}</span>
        <span class='text-gray-700'>${amount:.2}</span>
        <span class='text-gray-500'>- {employee} - {date}</span>
    </label>
</div>"#,
        id = id,
        state = state,
        merchant = escape_html(&tx.merchant),
        amount = tx.amount,
        employee = escape_html(&tx.employee.display_name()),
        date = tx.date,
    )
}

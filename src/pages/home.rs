use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;
use wasm_bindgen::JsValue;
use web_sys::File;

use crate::api::ApiClient;
use crate::components::force_graph::{
	Edge, ForceGraphCanvas, LayoutConfig, PathEdge, route_nodes,
};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::input::{parse_graph_csv, read_text};

/// Graph shown before anything is uploaded.
fn demo_edges() -> Vec<Edge> {
	[
		(0, 1, 2.0),
		(0, 2, 1.0),
		(1, 3, 2.0),
		(1, 4, 3.0),
		(2, 4, 6.0),
		(2, 5, 2.0),
		(3, 5, 7.0),
		(4, 5, 1.0),
	]
	.into_iter()
	.map(|(s, t, w)| Edge::new(s, t, w))
	.collect()
}

fn demo_path() -> Vec<PathEdge> {
	[(0, 1), (1, 4), (4, 5)]
		.into_iter()
		.map(|(s, t)| PathEdge::new(s, t))
		.collect()
}

fn local_timestamp() -> String {
	js_sys::Date::new_0()
		.to_locale_string("default", &JsValue::UNDEFINED)
		.into()
}

/// Upload form, graph view, resulting route and session history.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_else(AppConfig::from_env);
	let client = ApiClient::new(&config);
	let alpha_min = LayoutConfig::default().alpha_min;

	let edges = RwSignal::new(demo_edges());
	let path = RwSignal::new(demo_path());
	let error = RwSignal::new(None::<String>);
	let pending = RwSignal::new(false);
	let history = RwSignal::new(HistoryStore::new());
	let alpha = RwSignal::new(1.0);
	let file_input = NodeRef::<leptos::html::Input>::new();

	let selected_file = move || -> Option<File> { file_input.get()?.files()?.get(0) };

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let Some(file) = selected_file() else {
			error.set(Some(AppError::NoFile.to_string()));
			return;
		};
		let client = client.clone();
		pending.set(true);
		spawn_local(async move {
			match client.compute_shortest_path(&file).await {
				Ok(result) => {
					history.update(|h| {
						h.push(HistoryEntry {
							label: file.name(),
							timestamp: local_timestamp(),
							edges: result.edges.clone(),
							path: result.route.clone(),
						})
					});
					if let Some(cost) = result.route_cost {
						info!("Route cost for {}: {}", file.name(), cost);
					}
					edges.set(result.edges);
					path.set(result.route);
					error.set(None);
				}
				Err(err) => {
					edges.set(Vec::new());
					path.set(Vec::new());
					error.set(Some(err.to_string()));
				}
			}
			pending.set(false);
		});
	};

	let on_preview = move |_| {
		let Some(file) = selected_file() else {
			error.set(Some(AppError::NoFile.to_string()));
			return;
		};
		spawn_local(async move {
			match read_text(&file).await.and_then(|text| parse_graph_csv(&text)) {
				Ok(graph) => {
					info!(
						"Previewing {}: {} edges, route {} -> {} not computed",
						file.name(),
						graph.edges.len(),
						graph.source,
						graph.destination
					);
					edges.set(graph.edges);
					path.set(Vec::new());
					error.set(None);
				}
				Err(err) => error.set(Some(err.to_string())),
			}
		});
	};

	let route_text = move || {
		let nodes = route_nodes(&path.get());
		(!nodes.is_empty()).then(|| {
			let text = nodes
				.iter()
				.map(|n| n.to_string())
				.collect::<Vec<_>>()
				.join(", ");
			view! {
				<div class="route">
					<h3>"Resulting path:"</h3>
					<p class="route-nodes">{text}</p>
				</div>
			}
		})
	};

	let history_items = move || {
		history
			.get()
			.iter()
			.enumerate()
			.map(|(index, entry)| {
				let selected = entry.clone();
				view! {
					<li>
						<span
							class="history-link"
							on:click=move |_| {
								edges.set(selected.edges.clone());
								path.set(selected.path.clone());
							}
						>
							{format!("{} - {}", entry.label, entry.timestamp)}
						</span>
						<button on:click=move |_| {
							history.update(|h| {
								h.remove(index);
							})
						}>"Delete"</button>
					</li>
				}
			})
			.collect_view()
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="page">
				<h1 class="title">"Dijkstra's Algorithm"</h1>

				<ForceGraphCanvas
					edges=edges
					path=path
					width=config.canvas_width
					height=config.canvas_height
					alpha=alpha
				/>
				<p class="layout-status">
					{move || if alpha.get() < alpha_min { "Layout settled" } else { "Layout settling..." }}
				</p>

				{route_text}

				<div class="upload">
					<p><b>"Upload your graph"</b></p>
					<form on:submit=on_submit>
						<input node_ref=file_input type="file" accept=".csv" />
						<button type="submit" disabled=move || pending.get()>"Compute"</button>
						<button type="button" on:click=on_preview>"Preview"</button>
					</form>
					{move || error.get().map(|e| view! { <div class="error">{e}</div> })}
				</div>

				<div class="history">
					<h2>"History"</h2>
					<ul>{history_items}</ul>
				</div>
			</div>
		</ErrorBoundary>
	}
}

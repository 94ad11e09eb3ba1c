use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::force_graph::KnowledgeNetwork;

/// Reads the `genre` query parameter; anything that is not a number means
/// "all genres".
fn parse_genre(raw: Option<&str>) -> Option<u32> {
	raw?.trim().parse().ok()
}

/// Document list screen in its network mode. The page owns the genre filter:
/// it starts from `?genre=<id>` and follows genre clicks inside the graph.
#[component]
pub fn DocumentListPage() -> impl IntoView {
	let query = use_query_map();
	let selected_genre = RwSignal::new(None::<u32>);
	let include_inactive = RwSignal::new(false);

	Effect::new(move |_| {
		let genre = query.with(|q| parse_genre(q.get("genre").as_deref()));
		selected_genre.set(genre);
	});

	let on_genre_select = Callback::new(move |genre_id: Option<u32>| selected_genre.set(genre_id));

	view! {
		<div class="page">
			<main>
				<h2>"Knowledge Network"</h2>
				<div class="filter-bar">
					{move || {
						selected_genre
							.get()
							.map(|id| {
								view! {
									<span class="filter-chip">{format!("Genre #{id}")}</span>
									<button on:click=move |_| selected_genre.set(None)>
										"Show all genres"
									</button>
								}
							})
					}}
					<label>
						<input
							type="checkbox"
							prop:checked=move || include_inactive.get()
							on:change=move |ev| include_inactive.set(event_target_checked(&ev))
						/>
						" Include inactive"
					</label>
				</div>
				<div class="graph-card">
					<KnowledgeNetwork
						genre_id=selected_genre
						include_inactive=include_inactive
						on_genre_select=on_genre_select
					/>
				</div>
			</main>
		</div>
	}
}

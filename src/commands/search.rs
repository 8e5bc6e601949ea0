/// `search` command: rank the choices of a setup against a query.
use crate::cli::OutputCtx;
use crate::cli::args::SearchArgs;
use crate::cli::output::write_search_results;
use crate::commands::load_setup;
use crate::types::SearchResultOutput;
use choicekit::choices::SearchIndex;

/// Run `choicekit search`.
///
/// # Errors
///
/// Returns an error when the setup file cannot be loaded.
pub fn run(args: &SearchArgs, ctx: &OutputCtx) -> anyhow::Result<()> {
    let choices = load_setup(&args.setup)?;
    let store = choices.store();
    let config = choices.config();

    let index = SearchIndex::new(
        store.searchable_choices(),
        &config.search_fields,
        &config.fuzzy,
    );
    let limit = args.limit.unwrap_or(usize::MAX);

    let output: Vec<SearchResultOutput> = index
        .search(&args.query)
        .into_iter()
        .filter_map(|hit| {
            let choice = store.choice_by_id(hit.id)?;
            Some(SearchResultOutput {
                id: choice.id.0,
                value: choice.value.clone(),
                label: choice.label.clone(),
                score: hit.score,
            })
        })
        .take(limit)
        .collect();

    write_search_results(&output, ctx);
    Ok(())
}

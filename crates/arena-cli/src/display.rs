use colored::Colorize;
use comfy_table::{presets::ASCII_MARKDOWN, Cell, CellAlignment, Table};
use match_logic::{describe_strategy, MatchResult, ResultMatrix, Standing, StrategyParams};

fn markdown_table() -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table
}

/// Pairwise results: one row per strategy except the last, one column per
/// strategy except the first. Cells on or below the diagonal stay empty.
pub fn results_table(matrix: &ResultMatrix) -> Table {
    let catalog = matrix.catalog();
    let mut table = markdown_table();

    let mut header = vec![Cell::new("")];
    header.extend(catalog.iter().skip(1).map(|s| Cell::new(s.name())));
    table.set_header(header);

    for i in 0..catalog.len().saturating_sub(1) {
        let mut row = vec![Cell::new(catalog[i].name())];
        for j in 1..catalog.len() {
            let text = matrix.get(i, j).map(MatchResult::summary).unwrap_or_default();
            row.push(Cell::new(text));
        }
        table.add_row(row);
    }

    table
}

pub fn standings_table(standings: &[Standing]) -> Table {
    let mut table = markdown_table();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("strategy"),
        Cell::new("matches").set_alignment(CellAlignment::Right),
        Cell::new("total score").set_alignment(CellAlignment::Right),
    ]);
    for (rank, standing) in standings.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(standing.strategy.name()),
            Cell::new(standing.matches).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", standing.total_score))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn match_table(result: &MatchResult) -> Table {
    let mut table = markdown_table();
    table.set_header(vec![
        Cell::new("player"),
        Cell::new("strategy"),
        Cell::new("score").set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Player 1"),
        Cell::new(result.strategy_a.name()),
        Cell::new(format!("{:.2}", result.total_score_a)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Player 2"),
        Cell::new(result.strategy_b.name()),
        Cell::new(format!("{:.2}", result.total_score_b)).set_alignment(CellAlignment::Right),
    ]);
    table
}

pub fn strategies_table(params: &StrategyParams) -> Table {
    let mut table = markdown_table();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("id"),
        Cell::new("name"),
        Cell::new("random"),
        Cell::new("description"),
    ]);
    for strategy in match_logic::Strategy::CATALOG {
        table.add_row(vec![
            Cell::new(strategy.number()),
            Cell::new(strategy.id()),
            Cell::new(strategy.name()),
            Cell::new(if strategy.is_stochastic() { "yes" } else { "no" }),
            Cell::new(describe_strategy(strategy, params)),
        ]);
    }
    table
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_logic::{run_tournament, seeded, Mode, Rules, Strategy};

    fn matrix(catalog: &[Strategy], iterations: usize) -> ResultMatrix {
        run_tournament(&Rules::default(), iterations, catalog, Mode::Cumulative, &mut seeded(1))
    }

    #[test]
    fn test_results_table_shape() {
        let mut table = results_table(&matrix(&Strategy::CATALOG, 10));
        // Leading label column plus the six later strategies
        assert_eq!(table.column_count(), 7);
        assert_eq!(table.row_iter().count(), 6);

        let rendered = table.to_string();
        assert!(rendered.contains("randomness with reputation"));
        assert!(rendered.lines().any(|line| line.starts_with("| always defect ")));
        assert!(!rendered.lines().any(|line| line.starts_with("| randomness with reputation ")));
    }

    #[test]
    fn test_results_table_cells() {
        let catalog = [Strategy::AlwaysDefect, Strategy::AlwaysCollaborate, Strategy::TitForTat];
        let rendered = results_table(&matrix(&catalog, 1)).to_string();
        let row = |label: &str| {
            rendered
                .lines()
                .find(|line| line.starts_with(&format!("| {} ", label)))
                .unwrap_or_else(|| panic!("no row for {}", label))
        };

        assert_eq!(row("always defect").matches("(9.00, 2.00)").count(), 2);
        let collaborate = row("always collaborate");
        assert!(collaborate.contains("(6.00, 6.00)"));
        assert!(!collaborate.contains("(9.00"));
        assert!(!rendered.lines().any(|line| line.starts_with("| tit-for-tat ")));
    }

    #[test]
    fn test_standings_table_ranks() {
        let catalog = [Strategy::AlwaysDefect, Strategy::AlwaysCollaborate];
        let rendered = standings_table(&matrix(&catalog, 1).standings()).to_string();
        let defect = rendered.find("always defect").unwrap();
        let collaborate = rendered.find("always collaborate").unwrap();
        assert!(defect < collaborate);
        assert!(rendered.contains("9.00"));
    }

    #[test]
    fn test_strategies_table_lists_catalog() {
        let rendered = strategies_table(&StrategyParams::default()).to_string();
        for strategy in Strategy::CATALOG {
            assert!(rendered.contains(strategy.id()));
        }
        // Numbers match the pips drawn above each plot panel
        assert!(rendered.lines().any(|line| line.starts_with("| 4 ") && line.contains("random")));
    }
}

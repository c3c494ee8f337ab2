//! Display functions for command results

use super::formatters::{create_progress_bar, format_count, format_moves, format_tube};
use crate::commands::{
    AnalysisResult, ComparisonSummary, GenerateResult, LevelSummary, SolveReport,
};
use crate::core::Puzzle;
use crate::solver::SolverResult;
use colored::Colorize;

fn print_banner(title: &str, subject: &str) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} {} ", title.bright_cyan().bold(), subject.bright_yellow().bold());
    println!("{}", "═".repeat(60).cyan());
}

fn print_puzzle(puzzle: &Puzzle, indent: &str) {
    for (i, tube) in puzzle.tubes().iter().enumerate() {
        println!("{indent}{:>2} {}", i + 1, format_tube(tube));
    }
}

fn print_statistics(result: &SolverResult) {
    println!("\n📊 {}", "Search:".bright_cyan().bold());
    println!("   Mode:             {}", result.mode);
    println!("   Outcome:          {}", result.termination);
    println!("   States explored:  {}", format_count(result.states_explored));
    println!("   Unique states:    {}", format_count(result.unique_states));
    println!("   Max depth:        {}", result.max_depth);
    println!("   Dead ends:        {}", format_count(result.dead_ends));
    println!("   Decision points:  {}", format_count(result.decision_points));
    println!(
        "   Branching:        avg {:.2}, max {}",
        result.branching.avg, result.branching.max
    );
    println!("   Time:             {:.1} ms", result.elapsed_ms());
}

/// Print the result of solving a puzzle
pub fn print_solve_result(report: &SolveReport, verbose: bool) {
    print_banner("SOLVING:", &report.label);

    println!(
        "\nTarget: {} pieces or fewer (now {})",
        report.puzzle.target_piece_count(),
        report.puzzle.piece_count()
    );
    print_puzzle(&report.puzzle, "  ");

    let result = &report.result;
    for (i, (mv, position)) in result.path.iter().zip(&report.positions).enumerate() {
        let line = format!("\nMove {}: {mv}", i + 1);
        if mv.merged() {
            println!("{}", line.bright_green());
        } else {
            println!("{line}");
        }
        if verbose {
            print_puzzle(position, "  ");
        }
    }

    println!();
    if result.solvable {
        println!(
            "{}",
            format!(
                "✅ Solved in {} moves ({} merging, longest chain {})",
                format_moves(result.optimal_moves),
                result.merging_moves(),
                result.longest_chain()
            )
            .green()
            .bold()
        );
        match &report.verification {
            Ok(v) => println!("   Verified: {} pieces left", v.final_piece_count),
            Err(e) => println!("{}", format!("   Verification failed: {e}").red()),
        }
    } else if result.timed_out {
        println!(
            "{}",
            format!("⏱  Unresolved: {}", result.termination).yellow().bold()
        );
    } else {
        println!("{}", "❌ No solution exists".red().bold());
    }

    if verbose {
        print_statistics(result);
    }
}

/// Print a BFS vs A* comparison
pub fn print_comparison(summary: &ComparisonSummary) {
    print_banner("BFS vs A*", "");

    println!(
        "\n   {:<20} {:>5} {:>5} {:>10} {:>10} {:>8}  {}",
        "Level", "BFS", "A*", "BFS states", "A* states", "Speedup", "Check"
    );
    for row in &summary.rows {
        let check = if !row.conclusive() {
            "unresolved".yellow()
        } else if !row.moves_match() {
            "MISMATCH".red().bold()
        } else if row.astar.solvable && !row.astar_verified {
            "unverified".red()
        } else {
            "ok".green()
        };
        println!(
            "   {:<20} {:>5} {:>5} {:>10} {:>10} {:>7.1}x  {check}",
            row.label,
            format_moves(row.bfs.optimal_moves),
            format_moves(row.astar.optimal_moves),
            format_count(row.bfs.states_explored),
            format_count(row.astar.states_explored),
            row.speedup(),
        );
    }

    println!("\n📈 {}", "Summary:".bright_cyan().bold());
    println!("   Levels:           {}", summary.rows.len());
    println!("   Matching:         {}", summary.matches().to_string().green());
    let mismatches = summary.mismatches();
    if mismatches > 0 {
        println!("   Mismatched:       {}", mismatches.to_string().red().bold());
    } else {
        println!("   Mismatched:       0");
    }
    println!("   Unresolved:       {}", summary.unresolved());
    println!(
        "   States:           {} (BFS) vs {} (A*), {:.1}x",
        format_count(summary.total_bfs_states()),
        format_count(summary.total_astar_states()),
        summary.speedup()
    );
    println!("   Time taken:       {:.2}s", summary.elapsed.as_secs_f64());
}

/// Print the result of level analysis
pub fn print_analysis_result(analysis: &AnalysisResult) {
    print_banner("ANALYSIS:", &analysis.label);

    let validation = &analysis.validation;
    if validation.is_valid() {
        println!("\n{}", "✅ Level is valid".green());
    } else {
        println!("\n{}", "❌ Level is invalid".red().bold());
    }
    for issue in &validation.errors {
        println!("   {} {issue}", "error:".red().bold());
    }
    for issue in &validation.warnings {
        println!("   {} {issue}", "warning:".yellow());
    }

    let Some(structure) = &analysis.structure else {
        return;
    };

    println!("\n🧩 {}", "Structure:".bright_cyan().bold());
    println!("   Tubes:            {} ({} empty)", structure.tubes, structure.empty_tubes);
    println!(
        "   Pieces:           {} (target {}, theoretical minimum {})",
        structure.pieces, structure.target, structure.theoretical_min
    );
    println!(
        "   Fill:             [{}] {:.0}%",
        create_progress_bar(structure.fill_ratio, 1.0, 20).green(),
        structure.fill_ratio * 100.0
    );
    println!(
        "   Moves now:        {} legal, {} distinct",
        structure.legal_moves, structure.distinct_moves
    );
    println!(
        "   Estimate:         {} (reduction {}, disorder {})",
        structure.estimate, structure.reduction_bound, structure.disorder_bound
    );
    if structure.target_unreachable() {
        println!(
            "   {}",
            "Target is below the theoretical minimum".red().bold()
        );
    }
    if structure.stuck {
        println!("   {}", "No legal moves".red().bold());
    }

    if let Some(result) = &analysis.result {
        print_statistics(result);
        if result.solvable {
            println!(
                "   Optimal moves:    {}",
                format_moves(result.optimal_moves).bright_yellow().bold()
            );
        } else {
            println!("   Optimal moves:    {}", result.termination.to_string().red());
        }
        if let Some(ratio) = analysis.dead_end_ratio() {
            println!("   Dead-end ratio:   {:.1}%", ratio * 100.0);
        }
    }
}

/// Print the result of a generation run
pub fn print_generate_result(result: &GenerateResult) {
    let report = &result.report;
    print_banner("GENERATION", &format!("seed {}", result.seed));

    println!(
        "\n   {:<4} {:<12} {:>6} {:>6} {:>8} {:>8} {:>9}",
        "#", "Group", "Moves", "Fill", "Branch", "DeadEnd", "Attempts"
    );
    for generated in &report.levels {
        println!(
            "   {:<4} {:<12} {:>6} {:>5.0}% {:>8.2} {:>7.1}% {:>9}",
            generated.level.id.unwrap_or_default(),
            generated.group,
            generated.optimal_moves,
            generated.fill_ratio * 100.0,
            generated.avg_branching,
            generated.dead_end_ratio * 100.0,
            generated.attempts,
        );
    }

    for failure in &report.failures {
        let mut reasons: Vec<_> = failure.rejections.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        let reasons: Vec<String> = reasons.iter().map(|(k, v)| format!("{k} {v}")).collect();
        println!(
            "   {}",
            format!(
                "{} slot {} failed after {} attempts ({})",
                failure.group,
                failure.slot + 1,
                failure.attempts,
                reasons.join(", ")
            )
            .red()
        );
    }

    println!(
        "\n{}",
        format!(
            "Generated {} levels in {:.1}s",
            report.levels.len(),
            report.elapsed.as_secs_f64()
        )
        .green()
        .bold()
    );
    if let Some(path) = &result.output {
        println!("   Written to {}", path.display());
    }
}

/// Print the embedded level list
pub fn print_levels(levels: &[LevelSummary]) {
    print_banner("LEVELS", &levels.len().to_string());
    for level in levels {
        println!(
            "   {:>3}. {} tubes, {:>2} pieces, target {}   {}",
            level.number,
            level.tubes,
            level.pieces,
            level.target,
            level.compact.bright_black()
        );
    }
}

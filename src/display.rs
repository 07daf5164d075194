use crate::selector::RankedProblem;

pub fn display_ranked(ranked: &[RankedProblem]) {
    println!("\n{}", "=".repeat(100));
    println!("  Selected problems ({})", ranked.len());
    println!("{}", "=".repeat(100));

    println!(
        "{:>6}  {:<45} {:>7}  {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "id", "title", "score", "freq", "acc", "like", "topic", "rate", "comp"
    );
    println!("{}", "-".repeat(100));

    for item in ranked {
        let b = &item.breakdown;
        println!(
            "{:>6}  {:<45} {:>7.2}  {:>6.2} {:>6.2} {:>6.2} {:>6.2} {:>6.2} {:>6.2}",
            item.question_id,
            truncate(&item.title, 45),
            b.total,
            b.frequency,
            b.acceptance,
            b.like_ratio,
            b.topic,
            b.rating,
            b.company,
        );
    }
    println!("{}\n", "=".repeat(100));
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_titles_alone() {
        assert_eq!(truncate("Two Sum", 45), "Two Sum");
    }

    #[test]
    fn truncate_cuts_long_titles_with_ellipsis() {
        let long = "a".repeat(60);
        let out = truncate(&long, 45);
        assert_eq!(out.chars().count(), 45);
        assert!(out.ends_with("..."));
    }
}

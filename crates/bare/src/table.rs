use bare_core::Worktree;

pub struct TableFormatter {
    path_width: usize,
    branch_width: usize,
    head_width: usize,
    subject_width: usize,
}

impl TableFormatter {
    pub fn new(worktrees: &[Worktree]) -> Self {
        let path_width = worktrees
            .iter()
            .map(|w| w.path.display().to_string().len())
            .max()
            .unwrap_or(16)
            .clamp(4, 60);
        let branch_width = worktrees
            .iter()
            .map(|w| display_branch(w).len())
            .max()
            .unwrap_or(10)
            .clamp(6, 40);

        Self {
            path_width,
            branch_width,
            head_width: 8,
            subject_width: 40,
        }
    }

    pub fn print_table(&self, worktrees: &[Worktree]) {
        println!(
            "{:<path$}  {:<branch$}  {:<head$}  {:<subject$}",
            "Path",
            "Branch",
            "HEAD",
            "Subject",
            path = self.path_width,
            branch = self.branch_width,
            head = self.head_width,
            subject = self.subject_width,
        );
        for worktree in worktrees {
            self.print_row(worktree);
        }
    }

    fn print_row(&self, worktree: &Worktree) {
        let path = worktree.path.display().to_string();
        let head = worktree.head.as_deref().unwrap_or("-");
        let subject = worktree.commit_subject.as_deref().unwrap_or("");

        println!(
            "{:<path_w$}  {:<branch_w$}  {:<head_w$}  {:<subject_w$}",
            truncate(&path, self.path_width),
            truncate(&display_branch(worktree), self.branch_width),
            truncate(head, self.head_width),
            truncate(subject, self.subject_width),
            path_w = self.path_width,
            branch_w = self.branch_width,
            head_w = self.head_width,
            subject_w = self.subject_width,
        );
    }
}

/// Human label for a worktree's checkout state.
fn display_branch(worktree: &Worktree) -> String {
    if worktree.bare {
        return "(bare)".to_string();
    }
    if worktree.detached {
        return "(detached)".to_string();
    }
    worktree
        .branch
        .as_deref()
        .map(|b| b.strip_prefix("refs/heads/").unwrap_or(b).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Truncate a string to `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

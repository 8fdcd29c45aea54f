use score_state::State;

/// Render a short human-readable provisioning summary: every resource uid
/// next to the provider that claimed it, in no particular order (the
/// provisioning order itself is already traced live by `score-provision`).
pub fn render_summary(state: &State) -> String {
    if state.resources.is_empty() {
        return "No resources provisioned.".to_string();
    }
    let mut lines: Vec<String> = state
        .resources
        .iter()
        .map(|(uid, res)| format!("  {uid} -> {}", res.provisioner))
        .collect();
    lines.sort();
    format!("Provisioned {} resource(s):\n{}", state.resources.len(), lines.join("\n"))
}

use crate::space::SpaceId;

use anyhow::{Context, Result, anyhow, bail};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// Top `count` cards of `from`; `to: None` means whichever foundation takes them.
    Move {
        from: SpaceId,
        to: Option<SpaceId>,
        count: usize,
    },
    Tap(SpaceId),
    Undo,
    AutoFoundation,
    Quit,
}

/// Parses one command: `T1:T4@3`, `C2:F`, `T8:C1`, a bare space such as `T3` for a quick
/// click, or `u`, `a`, `q`.
pub fn parse_action(s: &str) -> Result<Action> {
    let part = s.trim();
    let part_ctx = || format!("Failed to parse move '{part}'");
    match part.to_ascii_lowercase().as_str() {
        "u" | "undo" => return Ok(Action::Undo),
        "a" | "auto" => return Ok(Action::AutoFoundation),
        "q" | "quit" => return Ok(Action::Quit),
        _ => {}
    }

    let Some((from_str, to_part)) = part.split_once(':') else {
        let space = parse_space_id(part)
            .with_context(part_ctx)?
            .ok_or_else(|| anyhow!("A foundation cannot be tapped"))?;
        return Ok(Action::Tap(space));
    };

    let from = parse_space_id(from_str)
        .with_context(part_ctx)?
        .ok_or_else(|| anyhow!("Moves cannot start from any foundation"))?;
    let (to_str, count) = match to_part.split_once('@') {
        Some((to_s, count_s)) => (to_s, count_s.parse::<usize>().with_context(part_ctx)?),
        None => (to_part, 1),
    };
    if count == 0 {
        bail!("A move needs at least one card; {}", part_ctx());
    }
    let to = parse_space_id(to_str).with_context(part_ctx)?;
    Ok(Action::Move { from, to, count })
}

/// Whitespace separated commands.
pub fn parse_actions(s: &str) -> Result<Vec<Action>> {
    s.split_whitespace().map(parse_action).collect()
}

/// `None` stands for the bare `F`.
fn parse_space_id(s: &str) -> Result<Option<SpaceId>> {
    let s = s.trim();
    let Some(prefix) = s.chars().next() else {
        bail!("Missing space identifier");
    };
    let rest = &s[prefix.len_utf8()..];
    let kind = prefix.to_ascii_uppercase();
    if kind == 'F' && rest.is_empty() {
        return Ok(None);
    }
    let num = rest
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .with_context(|| format!("Invalid space index: {rest}"))?;
    let id = match kind {
        'F' => SpaceId::Foundation(num),
        'C' => SpaceId::FreeCell(num),
        'T' => SpaceId::Tableau(num),
        _ => bail!("Invalid space identifier: {s}"),
    };
    if !id.is_valid() {
        bail!("No such space: {s}");
    }
    Ok(Some(id))
}

pub fn format_action(action: &Action) -> String {
    match *action {
        Action::Move { from, to, count } => {
            let mut s = format!(
                "{}:{}",
                from.notation(),
                to.map(|id| id.notation()).unwrap_or_else(|| "F".into())
            );
            if count > 1 {
                s.push_str(&format!("@{count}"));
            }
            s
        }
        Action::Tap(id) => id.notation(),
        Action::Undo => "u".into(),
        Action::AutoFoundation => "a".into(),
        Action::Quit => "q".into(),
    }
}

const ACTIONS_PER_LINE: usize = 10;

/// Space separated, wrapped every ten actions.
pub fn format_actions(actions: &[Action]) -> String {
    actions
        .chunks(ACTIONS_PER_LINE)
        .map(|line| line.iter().map(format_action).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

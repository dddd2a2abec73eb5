//! Fixed review prompt templates.
//!
//! Each template is a plain `format!` call over typed fields, so the
//! placeholder set is checked at compile time and rendering is deterministic.
//! Section labels and field order are part of the contract with downstream
//! tooling; do not reorder them.

use crate::checker::blueprint::{resolve_next_outline, OutlineEntry};
use crate::checker::narrative::NarrativeContext;

/// Phrase the narrative reviewer is told to return when it finds nothing.
pub const NO_CONFLICT_PHRASE: &str = "无明显冲突";

/// Phrase the blueprint reviewer is told to return in its second section
/// when no content was written ahead of plan.
pub const NO_EARLY_CONTENT_PHRASE: &str = "无内容提前";

/// Stands in for every text field of a next-chapter outline entry that does
/// not exist yet.
pub const MISSING_OUTLINE_PLACEHOLDER: &str = "（暂无目录信息）";

/// Renders the narrative consistency review prompt.
///
/// Field order is fixed: setting, character state, summary, plot arcs,
/// chapter text. Empty fields render as empty sections; an empty
/// `plot_arcs` is the normal case for stories without recorded open
/// threads.
pub fn narrative_review_prompt(ctx: &NarrativeContext) -> String {
    format!(
        "请检查下面的小说设定与最新章节是否存在明显冲突或不一致之处，如有请列出：
- 小说设定：
{novel_setting}

- 角色状态（可能包含重要信息）：
{character_state}

- 前文摘要：
{global_summary}

- 已记录的未解决冲突或剧情要点：
{plot_arcs}

- 最新章节内容：
{chapter_text}

如果存在冲突或不一致，请说明；如果在未解决冲突中有被忽略或需要推进的地方，也请提及；否则请返回\"{no_conflict}\"。
",
        novel_setting = ctx.novel_setting,
        character_state = ctx.character_state,
        global_summary = ctx.global_summary,
        plot_arcs = ctx.plot_arcs,
        chapter_text = ctx.chapter_text,
        no_conflict = NO_CONFLICT_PHRASE,
    )
}

/// Renders the blueprint review prompt.
///
/// The next-chapter entry is resolved through [`resolve_next_outline`]
/// first, so the prompt never shows empty next-chapter fields. Chapter
/// numbers render as `第{n}章`.
pub fn blueprint_review_prompt(
    current: &OutlineEntry,
    next: &OutlineEntry,
    chapter_text: &str,
) -> String {
    let next = resolve_next_outline(current, next);
    format!(
        "请检查当前章节的内容是否符合章节目录的规划，并检查是否提前写了下一章的内容。

- 当前章节目录信息：
  章号：第{current_chapter_number}章
  标题：{current_chapter_title}
  本章定位：{current_chapter_role}
  核心作用：{current_chapter_purpose}
  本章简述：{current_chapter_summary}

- 下一章节目录信息：
  章号：第{next_chapter_number}章
  标题：{next_chapter_title}
  本章定位：{next_chapter_role}
  核心作用：{next_chapter_purpose}
  本章简述：{next_chapter_summary}

- 当前章节内容：
{chapter_text}

请检查以下方面并返回结果：
1. 当前章节是否符合本章在目录中的定位和核心作用？
2. 当前章节是否提前涉及了下一章的情节、冲突或关键事件？
3. 如果检测到内容提前到了下一章，请具体指出哪些内容应该属于下一章，并建议如何调整。

请按以下格式返回：
【一致性检查】
[检查结果]

【内容提前检测】
[如果检测到内容提前，列出具体内容和建议；否则返回\"{no_early_content}\"]
",
        current_chapter_number = current.chapter_number,
        current_chapter_title = current.chapter_title,
        current_chapter_role = current.chapter_role,
        current_chapter_purpose = current.chapter_purpose,
        current_chapter_summary = current.chapter_summary,
        next_chapter_number = next.chapter_number,
        next_chapter_title = next.chapter_title,
        next_chapter_role = next.chapter_role,
        next_chapter_purpose = next.chapter_purpose,
        next_chapter_summary = next.chapter_summary,
        chapter_text = chapter_text,
        no_early_content = NO_EARLY_CONTENT_PHRASE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> NarrativeContext {
        NarrativeContext {
            novel_setting: "修真世界，灵气四十年前开始复苏。".to_string(),
            character_state: "林远：金丹期，左臂旧伤未愈。".to_string(),
            global_summary: "前十章讲述林远入门与夺剑。".to_string(),
            plot_arcs: "断剑的来历尚未揭晓。".to_string(),
            chapter_text: "第十一章正文……".to_string(),
        }
    }

    fn chapter_three() -> OutlineEntry {
        OutlineEntry {
            chapter_number: 3,
            chapter_title: "Ambush".to_string(),
            chapter_role: "rising action".to_string(),
            chapter_purpose: "raise stakes".to_string(),
            chapter_summary: "Hero is ambushed.".to_string(),
        }
    }

    #[test]
    fn test_narrative_prompt_keeps_field_order() {
        let prompt = narrative_review_prompt(&sample_context());
        let setting = prompt.find("修真世界").unwrap();
        let state = prompt.find("林远：金丹期").unwrap();
        let summary = prompt.find("前十章讲述").unwrap();
        let arcs = prompt.find("断剑的来历").unwrap();
        let text = prompt.find("第十一章正文").unwrap();
        assert!(setting < state);
        assert!(state < summary);
        assert!(summary < arcs);
        assert!(arcs < text);
    }

    #[test]
    fn test_narrative_prompt_labels_every_section() {
        let prompt = narrative_review_prompt(&sample_context());
        for label in [
            "- 小说设定：",
            "- 角色状态（可能包含重要信息）：",
            "- 前文摘要：",
            "- 已记录的未解决冲突或剧情要点：",
            "- 最新章节内容：",
        ] {
            assert!(prompt.contains(label), "missing section label: {label}");
        }
        assert!(prompt.contains(NO_CONFLICT_PHRASE));
    }

    #[test]
    fn test_narrative_prompt_tolerates_empty_plot_arcs() {
        let ctx = NarrativeContext {
            plot_arcs: String::new(),
            ..sample_context()
        };
        let prompt = narrative_review_prompt(&ctx);
        assert!(prompt.contains("- 已记录的未解决冲突或剧情要点：\n\n"));
        assert!(prompt.contains("- 最新章节内容："));
        assert!(!prompt.contains(MISSING_OUTLINE_PLACEHOLDER));
    }

    #[test]
    fn test_narrative_prompt_is_deterministic() {
        let ctx = sample_context();
        assert_eq!(narrative_review_prompt(&ctx), narrative_review_prompt(&ctx));
    }

    #[test]
    fn test_blueprint_prompt_synthesizes_missing_next_entry() {
        let prompt =
            blueprint_review_prompt(&chapter_three(), &OutlineEntry::default(), "chapter body");
        assert!(prompt.contains("第3章"));
        assert!(prompt.contains("Ambush"));
        assert!(prompt.contains("第4章"));
        assert!(prompt.contains(MISSING_OUTLINE_PLACEHOLDER));
    }

    #[test]
    fn test_blueprint_prompt_orders_current_next_text() {
        let next = OutlineEntry {
            chapter_number: 4,
            chapter_title: "Counterattack".to_string(),
            chapter_role: "payoff".to_string(),
            chapter_purpose: "resolve the ambush".to_string(),
            chapter_summary: "Hero strikes back.".to_string(),
        };
        let prompt = blueprint_review_prompt(&chapter_three(), &next, "the chapter body");
        let current_pos = prompt.find("第3章").unwrap();
        let next_pos = prompt.find("第4章").unwrap();
        let text_pos = prompt.find("the chapter body").unwrap();
        assert!(current_pos < next_pos);
        assert!(next_pos < text_pos);
    }

    #[test]
    fn test_blueprint_prompt_mandates_two_reply_sections() {
        let prompt = blueprint_review_prompt(&chapter_three(), &OutlineEntry::default(), "body");
        let check_pos = prompt.find("【一致性检查】").unwrap();
        let early_pos = prompt.find("【内容提前检测】").unwrap();
        assert!(check_pos < early_pos);
        assert!(prompt.contains(NO_EARLY_CONTENT_PHRASE));
    }

    #[test]
    fn test_blueprint_prompt_keeps_present_next_entry() {
        let next = OutlineEntry {
            chapter_number: 4,
            chapter_title: "Counterattack".to_string(),
            chapter_role: "payoff".to_string(),
            chapter_purpose: "resolve the ambush".to_string(),
            chapter_summary: "Hero strikes back.".to_string(),
        };
        let prompt = blueprint_review_prompt(&chapter_three(), &next, "body");
        assert!(prompt.contains("标题：Counterattack"));
        assert!(!prompt.contains(MISSING_OUTLINE_PLACEHOLDER));
    }

    #[test]
    fn test_blueprint_prompt_with_empty_current_renders_chapter_zero() {
        let prompt =
            blueprint_review_prompt(&OutlineEntry::default(), &OutlineEntry::default(), "");
        assert!(prompt.contains("章号：第0章"));
        assert!(prompt.contains("章号：第1章"));
    }

    #[test]
    fn test_blueprint_prompt_is_deterministic() {
        let current = chapter_three();
        let next = OutlineEntry::default();
        assert_eq!(
            blueprint_review_prompt(&current, &next, "正文"),
            blueprint_review_prompt(&current, &next, "正文")
        );
    }
}

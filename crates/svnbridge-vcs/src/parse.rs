//! Decoding of client output into typed values.
//!
//! Anything written to the error stream wins: when error lines are present
//! the output is not inspected at all and the joined error text is surfaced
//! as a [`SvnError::ProcessFailure`]. XML decoding fails closed; a missing
//! element or attribute yields [`SvnError::MalformedOutput`] rather than a
//! default value.

use crate::error::{Result, SvnError};
use crate::path::RepositoryPath;
use crate::types::{BranchEntry, ExecutionResult, WorkingCopyInfo};
use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};

/// Non-empty output lines.
#[must_use]
pub fn lines(result: &ExecutionResult) -> Vec<String> {
    result
        .output_lines
        .iter()
        .filter(|l| !l.is_empty())
        .cloned()
        .collect()
}

/// Fail if the client reported anything on its error stream or exited non-zero.
///
/// # Errors
/// Returns [`SvnError::ProcessFailure`] with the joined error text.
pub fn ensure_no_errors(result: &ExecutionResult, command: &str) -> Result<()> {
    if result.error_lines.is_empty() && result.succeeded() {
        Ok(())
    } else {
        Err(result.clone().into_failure(command))
    }
}

/// Non-empty output lines of a successful invocation.
///
/// # Errors
/// Returns [`SvnError::ProcessFailure`] if the client reported errors.
pub fn checked_lines(result: &ExecutionResult, command: &str) -> Result<Vec<String>> {
    ensure_no_errors(result, command)?;
    Ok(lines(result))
}

/// Last-changed revision from `info --xml` output.
///
/// # Errors
/// Returns [`SvnError::ProcessFailure`] if the client reported errors, or
/// [`SvnError::MalformedOutput`] if `info/entry/commit@revision` is missing.
pub fn xml_revision(result: &ExecutionResult, command: &str) -> Result<String> {
    ensure_no_errors(result, command)?;
    let text = result.output_lines.join("\n");
    let doc = parse_document(command, &text)?;
    let entry = info_entry(command, &doc)?;
    let commit = required_child(command, entry, "commit")?;
    required_attribute(command, commit, "revision").map(str::to_string)
}

/// URL and revision of a working copy from `info --xml` output.
///
/// # Errors
/// Returns [`SvnError::ProcessFailure`] if the client reported errors, or
/// [`SvnError::MalformedOutput`] if `entry@revision` or `entry/url` is missing.
pub fn xml_working_copy_info(result: &ExecutionResult, command: &str) -> Result<WorkingCopyInfo> {
    ensure_no_errors(result, command)?;
    let text = result.output_lines.join("\n");
    let doc = parse_document(command, &text)?;
    let entry = info_entry(command, &doc)?;
    let revision = required_attribute(command, entry, "revision")?.to_string();
    let url = required_text(command, entry, "url")?;
    Ok(WorkingCopyInfo { url, revision })
}

/// Branch lines of development from `ls --xml <root> <root>/branches/` output.
///
/// The output must hold exactly two `list` elements. From the first only a
/// directory named `trunk` is taken; from the second every directory is a
/// branch.
///
/// # Errors
/// Returns [`SvnError::ProcessFailure`] if the client reported errors, or
/// [`SvnError::MalformedOutput`] if the structure differs from the above.
pub fn xml_branches(
    result: &ExecutionResult,
    root: &RepositoryPath,
    command: &str,
) -> Result<Vec<BranchEntry>> {
    ensure_no_errors(result, command)?;
    let text = result.output_lines.join("\n");
    let doc = parse_document(command, &text)?;

    let lists: Vec<Node<'_, '_>> = doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("list"))
        .collect();
    let [root_list, branches_list] = lists.as_slice() else {
        return Err(SvnError::malformed(
            command,
            format!("expected 2 <list> elements, found {}", lists.len()),
        ));
    };

    let mut branches = Vec::new();
    for entry in directories(*root_list) {
        if required_text(command, entry, "name")? == "trunk" {
            branches.push(decode_branch(command, entry, root.join("trunk/"))?);
            break;
        }
    }
    for entry in directories(*branches_list) {
        let name = required_text(command, entry, "name")?;
        let path = root.join(&format!("branches/{name}/"));
        branches.push(decode_branch(command, entry, path)?);
    }
    Ok(branches)
}

fn parse_document<'a>(command: &str, text: &'a str) -> Result<Document<'a>> {
    Document::parse(text).map_err(|e| SvnError::malformed(command, e.to_string()))
}

fn info_entry<'a, 'input>(command: &str, doc: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    let root = doc.root_element();
    if !root.has_tag_name("info") {
        return Err(SvnError::malformed(
            command,
            format!("expected <info> root, found <{}>", root.tag_name().name()),
        ));
    }
    required_child(command, root, "entry")
}

fn directories<'a, 'input>(list: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    list.children()
        .filter(|n| n.has_tag_name("entry") && n.attribute("kind") == Some("dir"))
}

fn decode_branch(command: &str, entry: Node<'_, '_>, path: RepositoryPath) -> Result<BranchEntry> {
    let commit = required_child(command, entry, "commit")?;
    let revision = required_attribute(command, commit, "revision")?.to_string();
    let author = optional_text(commit, "author");
    let date_text = required_text(command, commit, "date")?;
    let date = DateTime::parse_from_rfc3339(&date_text)
        .map_err(|e| SvnError::malformed(command, format!("invalid commit date '{date_text}': {e}")))?
        .with_timezone(&Utc);
    Ok(BranchEntry {
        path,
        revision,
        author,
        date,
    })
}

fn required_child<'a, 'input>(
    command: &str,
    node: Node<'a, 'input>,
    name: &str,
) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .ok_or_else(|| {
            SvnError::malformed(
                command,
                format!("<{}> has no <{name}> element", node.tag_name().name()),
            )
        })
}

fn required_attribute<'a>(command: &str, node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        SvnError::malformed(
            command,
            format!("<{}> has no '{name}' attribute", node.tag_name().name()),
        )
    })
}

fn required_text(command: &str, node: Node<'_, '_>, name: &str) -> Result<String> {
    let child = required_child(command, node, name)?;
    child
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SvnError::malformed(command, format!("<{name}> is empty")))
}

fn optional_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROOT: &str = "https://svn.example.com/repo";

    fn output(text: &str) -> ExecutionResult {
        ExecutionResult::new(0, text.lines().map(str::to_string).collect(), vec![])
    }

    const INFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<info>
<entry kind="dir" path="." revision="57">
<url>https://svn.example.com/repo/trunk</url>
<commit revision="42">
<author>alice</author>
<date>2024-03-01T10:00:00.000000Z</date>
</commit>
</entry>
</info>"#;

    const BRANCHES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lists>
<list path="https://svn.example.com/repo">
<entry kind="dir">
<name>branches</name>
<commit revision="30"><author>bob</author><date>2024-02-01T09:00:00.000000Z</date></commit>
</entry>
<entry kind="file">
<name>README</name>
<size>12</size>
<commit revision="2"><author>bob</author><date>2024-01-01T09:00:00.000000Z</date></commit>
</entry>
<entry kind="dir">
<name>trunk</name>
<commit revision="41"><author>alice</author><date>2024-02-28T12:30:00.000000Z</date></commit>
</entry>
</list>
<list path="https://svn.example.com/repo/branches">
<entry kind="dir">
<name>release-1.0</name>
<commit revision="35"><date>2024-02-10T08:15:00.000000Z</date></commit>
</entry>
</list>
</lists>"#;

    #[test]
    fn lines_drop_empty_entries() {
        let result = output("trunk/\n\nbranches/\n");
        assert_eq!(lines(&result), vec!["trunk/", "branches/"]);
    }

    #[test]
    fn error_stream_takes_precedence() {
        let result = ExecutionResult::new(
            0,
            vec!["trunk/".into()],
            vec!["svn: warning: W160013: path not found".into()],
        );
        let err = checked_lines(&result, "svn ls").unwrap_err();
        assert!(matches!(err, SvnError::ProcessFailure { ref stderr, .. } if stderr.contains("W160013")));
    }

    #[test]
    fn revision_from_info() {
        assert_eq!(xml_revision(&output(INFO), "info").unwrap(), "42");
    }

    #[test]
    fn revision_requires_commit_element() {
        let xml = r#"<info><entry kind="dir" revision="3"><url>x</url></entry></info>"#;
        let err = xml_revision(&output(xml), "info").unwrap_err();
        assert!(matches!(err, SvnError::MalformedOutput { .. }));
    }

    #[test]
    fn revision_requires_info_root() {
        let err = xml_revision(&output("<entry><commit revision=\"1\"/></entry>"), "info").unwrap_err();
        assert!(matches!(err, SvnError::MalformedOutput { .. }));
    }

    #[test]
    fn revision_rejects_non_xml() {
        let err = xml_revision(&output("svn: something odd"), "info").unwrap_err();
        assert!(matches!(err, SvnError::MalformedOutput { .. }));
    }

    #[test]
    fn working_copy_info_from_info() {
        let info = xml_working_copy_info(&output(INFO), "info").unwrap();
        assert_eq!(info.url, "https://svn.example.com/repo/trunk");
        assert_eq!(info.revision, "57");
    }

    #[test]
    fn branches_from_two_listings() {
        let root = RepositoryPath::root(ROOT).unwrap();
        let branches = xml_branches(&output(BRANCHES), &root, "ls").unwrap();
        assert_eq!(branches.len(), 2);

        assert_eq!(branches[0].branch_name(), "trunk");
        assert_eq!(branches[0].revision, "41");
        assert_eq!(branches[0].author.as_deref(), Some("alice"));
        assert_eq!(
            branches[0].path.absolute_path(),
            "https://svn.example.com/repo/trunk/"
        );

        assert_eq!(branches[1].branch_name(), "branches/release-1.0");
        assert_eq!(branches[1].revision, "35");
        assert_eq!(branches[1].author, None);
        assert_eq!(branches[1].date.to_rfc3339(), "2024-02-10T08:15:00+00:00");
    }

    #[test]
    fn branches_without_trunk() {
        let xml = r#"<lists><list path="r"><entry kind="dir"><name>tags</name>
<commit revision="1"><date>2024-01-01T00:00:00Z</date></commit></entry></list>
<list path="r/branches"></list></lists>"#;
        let root = RepositoryPath::root(ROOT).unwrap();
        assert!(xml_branches(&output(xml), &root, "ls").unwrap().is_empty());
    }

    #[test]
    fn branches_require_two_lists() {
        let xml = r#"<lists><list path="r"></list></lists>"#;
        let root = RepositoryPath::root(ROOT).unwrap();
        let err = xml_branches(&output(xml), &root, "ls").unwrap_err();
        assert!(
            matches!(err, SvnError::MalformedOutput { ref reason, .. } if reason.contains("found 1"))
        );
    }

    #[test]
    fn branches_require_commit_date() {
        let xml = r#"<lists><list path="r"></list><list path="r/branches">
<entry kind="dir"><name>b1</name><commit revision="9"></commit></entry></list></lists>"#;
        let root = RepositoryPath::root(ROOT).unwrap();
        let err = xml_branches(&output(xml), &root, "ls").unwrap_err();
        assert!(matches!(err, SvnError::MalformedOutput { .. }));
    }
}

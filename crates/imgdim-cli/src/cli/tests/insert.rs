//! Tests for insert argument parsing.

use super::parse;
use crate::cli::{Cli, CliCommand, PolicyArg};
use clap::Parser;
use imgdim_core::config::ContextPolicy;
use std::path::PathBuf;

#[test]
fn cli_parse_insert_minimal() {
    match parse(&["imgdim", "insert", "main.css", "--line", "3", "--column", "12"]) {
        CliCommand::Insert {
            file,
            line,
            column,
            end_line,
            end_column,
            policy,
            dry_run,
        } => {
            assert_eq!(file, PathBuf::from("main.css"));
            assert_eq!((line, column), (3, 12));
            assert!(end_line.is_none() && end_column.is_none());
            assert!(policy.is_none());
            assert!(!dry_run);
        }
        _ => panic!("expected Insert"),
    }
}

#[test]
fn cli_parse_insert_full() {
    match parse(&[
        "imgdim",
        "insert",
        "a.html",
        "--line",
        "1",
        "--column",
        "2",
        "--end-line",
        "1",
        "--end-column",
        "9",
        "--policy",
        "capture",
        "--dry-run",
    ]) {
        CliCommand::Insert {
            end_line,
            end_column,
            policy,
            dry_run,
            ..
        } => {
            assert_eq!(end_line, Some(1));
            assert_eq!(end_column, Some(9));
            assert_eq!(policy, Some(PolicyArg::Capture));
            assert!(dry_run);
        }
        _ => panic!("expected Insert"),
    }
}

#[test]
fn cli_insert_requires_position() {
    assert!(Cli::try_parse_from(["imgdim", "insert", "main.css"]).is_err());
}

#[test]
fn policy_arg_maps_to_context_policy() {
    assert_eq!(
        ContextPolicy::from(PolicyArg::Resolve),
        ContextPolicy::ResolveAtCompletion
    );
    assert_eq!(
        ContextPolicy::from(PolicyArg::Capture),
        ContextPolicy::CaptureAtInvocation
    );
}

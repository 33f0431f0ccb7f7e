//! # RAG Advisor
//!
//! A management-advisor assistant that answers questions with a language
//! model, optionally grounded in excerpts from the user's own documents.
//!
//! The retrieval core (chunking, keyword ranking, prompt composition) lives
//! in the `rag-advisor-core` crate. This crate adds everything around it:
//! configuration, document loading and text extraction, the generation
//! service client, the conversation session and the `advisor` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Documents  │──▶│   Pipeline   │──▶│    Prompt    │
//! │ PDF/MD/TXT  │   │ Chunk + Rank │   │ RAG / bare   │
//! └─────────────┘   └──────────────┘   └──────┬───────┘
//!                                             │
//!                                             ▼
//!                   ┌──────────────┐   ┌──────────────┐
//!                   │   Session    │◀──│  Generation  │
//!                   │  + history   │   │  OpenRouter  │
//!                   └──────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! advisor prompt "How do I run a good 1:1?" --docs ./handbook.pdf
//! advisor search "delegation" --docs ./docs
//! export OPENROUTER_API_KEY=sk-or-...
//! advisor ask "How do I delegate effectively?" --docs ./docs
//! advisor chat --docs ./docs
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`documents`] | Loading files and directories |
//! | [`extract`] | Text extraction (PDF, Markdown, plain text) |
//! | [`generation`] | Generation service trait and OpenRouter client |
//! | [`session`] | Conversation state |
//! | [`progress`] | Loading progress on stderr |
//! | [`ask`] | `prompt`, `ask` and `check-key` commands |
//! | [`search`] | `search` and `chunks` commands |
//! | [`chat`] | Interactive `chat` command |

pub mod ask;
pub mod chat;
pub mod config;
pub mod documents;
pub mod extract;
pub mod generation;
pub mod progress;
pub mod search;
pub mod session;

//! Command scheduling and stream subscriptions
//!
//! Side effects only enter the application as [`Command`]s: deferred futures
//! that resolve to at most one event. The [`Scheduler`] runs them off the
//! reducer's thread and forwards whatever they produce into the event
//! channel. Long-lived producers (log and stats streams) are wrapped in a
//! [`Subscription`], which hands out one "next" command at a time; the
//! owner must issue a fresh one after every delivered event to keep the
//! stream flowing.

pub mod command;
pub mod subscription;

pub use command::{Command, Scheduler};
pub use subscription::{Delivery, Subscription, SubscriptionId, SubscriptionIds};

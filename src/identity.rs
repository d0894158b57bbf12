// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

/// Who owns the records being read and written. Watchers receive the
/// current session immediately and again on every sign-in or sign-out.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<String>;
    fn watch_sessions(&self) -> Receiver<Option<String>>;
}

#[derive(Default)]
pub struct LocalIdentity {
    inner: Mutex<IdentityInner>,
}

#[derive(Default)]
struct IdentityInner {
    user: Option<String>,
    watchers: Vec<Sender<Option<String>>>,
}

impl LocalIdentity {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: &str) -> Self {
        let identity = Self::default();
        identity.lock().user = Some(user.to_string());
        identity
    }

    pub fn sign_in(&self, user: &str) {
        let mut inner = self.lock();
        inner.user = Some(user.to_string());
        announce(&mut inner);
        tracing::debug!(user, "session started");
    }

    pub fn sign_out(&self) {
        let mut inner = self.lock();
        inner.user = None;
        announce(&mut inner);
        tracing::debug!("session ended");
    }

    fn lock(&self) -> MutexGuard<'_, IdentityInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> Option<String> {
        self.lock().user.clone()
    }

    fn watch_sessions(&self) -> Receiver<Option<String>> {
        let (sender, receiver) = channel();
        let mut inner = self.lock();
        let _ = sender.send(inner.user.clone());
        inner.watchers.push(sender);
        receiver
    }
}

fn announce(inner: &mut IdentityInner) {
    let session = inner.user.clone();
    inner
        .watchers
        .retain(|watcher| watcher.send(session.clone()).is_ok());
}

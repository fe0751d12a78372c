// src/post_office/office.rs

use crate::coroutine::{CoroutineId, Delivery};
use crate::error::CourierError;
use crate::message::Value;
use crate::options::PostOfficeOptions;
use crate::post_office::mailbox::Mailbox;
use crate::post_office::{IPostOffice, Link, Port};

use linked_hash_map::LinkedHashMap;
use std::collections::HashMap;

/// The default in-memory [`IPostOffice`].
///
/// Mailboxes of a sink are kept in the order their first link was
/// registered, which makes `retrieve` deterministic across inboxes.
#[derive(Debug, Default)]
pub struct PostOffice {
  options: PostOfficeOptions,
  /// Registered links, in registration order.
  links: LinkedHashMap<Link, ()>,
  /// Maps an outlet `(source, outbox)` to its linked inlets, in registration order.
  routes: HashMap<Port, Vec<Port>>,
  /// Maps a sink to its mailboxes, keyed by inbox name.
  mailboxes: HashMap<CoroutineId, LinkedHashMap<String, Mailbox>>,
}

impl PostOffice {
  /// Creates a strict post office.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a post office where registration and unregistration are idempotent.
  pub fn lenient() -> Self {
    Self::with_options(PostOfficeOptions::lenient())
  }

  pub fn with_options(options: PostOfficeOptions) -> Self {
    Self {
      options,
      ..Self::default()
    }
  }

  pub fn options(&self) -> PostOfficeOptions {
    self.options
  }

  /// Iterates over registered links in registration order.
  pub fn links(&self) -> impl Iterator<Item = &Link> {
    self.links.keys()
  }

  pub fn link_count(&self) -> usize {
    self.links.len()
  }

  pub fn is_linked(&self, link: &Link) -> bool {
    self.links.contains_key(link)
  }

  /// Number of messages queued for `sink` across all its inboxes.
  pub fn pending(&self, sink: CoroutineId) -> usize {
    self
      .mailboxes
      .get(&sink)
      .map_or(0, |inboxes| inboxes.values().map(Mailbox::len).sum())
  }

  /// True while `sink` owns at least one mailbox, linked or not yet drained.
  pub fn is_sink(&self, sink: CoroutineId) -> bool {
    self.mailboxes.contains_key(&sink)
  }

  fn attach(&mut self, link: &Link) {
    self
      .routes
      .entry(link.outlet())
      .or_insert_with(Vec::new)
      .push(link.inlet());

    let inboxes = self.mailboxes.entry(link.sink).or_insert_with(LinkedHashMap::new);
    if !inboxes.contains_key(&link.inbox) {
      tracing::trace!(sink = %link.sink, inbox = %link.inbox, "PostOffice created mailbox");
      inboxes.insert(link.inbox.clone(), Mailbox::new());
    }
    if let Some(mailbox) = inboxes.get_mut(&link.inbox) {
      mailbox.link_attached();
    }
  }

  fn detach(&mut self, link: &Link) {
    let outlet = link.outlet();
    if let Some(inlets) = self.routes.get_mut(&outlet) {
      let inlet = link.inlet();
      inlets.retain(|candidate| *candidate != inlet);
      if inlets.is_empty() {
        self.routes.remove(&outlet);
      }
    }

    if let Some(inboxes) = self.mailboxes.get_mut(&link.sink) {
      let reclaim = match inboxes.get_mut(&link.inbox) {
        Some(mailbox) => {
          mailbox.link_detached();
          mailbox.is_reclaimable()
        }
        None => false,
      };
      if reclaim {
        inboxes.remove(&link.inbox);
        tracing::trace!(sink = %link.sink, inbox = %link.inbox, "PostOffice reclaimed mailbox");
      }
      if inboxes.is_empty() {
        self.mailboxes.remove(&link.sink);
      }
    }
  }
}

impl IPostOffice for PostOffice {
  fn register(&mut self, links: &[Link]) -> Result<(), CourierError> {
    for link in links {
      if self.links.contains_key(link) {
        if self.options.link_ignores_duplicates {
          tracing::debug!(%link, "PostOffice ignoring duplicate link");
          continue;
        }
        return Err(CourierError::LinkExists(link.clone()));
      }
      self.links.insert(link.clone(), ());
      self.attach(link);
      tracing::debug!(%link, "PostOffice registered link");
    }
    Ok(())
  }

  fn unregister(&mut self, links: &[Link]) -> Result<(), CourierError> {
    for link in links {
      if self.links.remove(link).is_none() {
        if self.options.unlink_ignores_missing {
          tracing::debug!(%link, "PostOffice ignoring unregistration of unknown link");
          continue;
        }
        return Err(CourierError::NoLink {
          outlet: link.outlet(),
          inlet: Some(link.inlet()),
        });
      }
      self.detach(link);
      tracing::debug!(%link, "PostOffice unregistered link");
    }
    Ok(())
  }

  fn post(&mut self, source: CoroutineId, outbox: &str, message: Value) -> Result<(), CourierError> {
    let outlet = Port::new(source, outbox);
    let inlets = match self.routes.get(&outlet) {
      Some(inlets) => inlets,
      None => return Err(CourierError::NoLink { outlet, inlet: None }),
    };

    for inlet in inlets {
      let mailbox = self
        .mailboxes
        .get_mut(&inlet.coroutine)
        .and_then(|inboxes| inboxes.get_mut(&inlet.name))
        .ok_or(CourierError::InvalidState("linked inbox has no mailbox"))?;
      mailbox.push(message.clone());
      tracing::trace!(from = %outlet, to = %inlet, queued = mailbox.len(), "PostOffice queued message");
    }
    Ok(())
  }

  fn retrieve(&mut self, sink: CoroutineId) -> Result<Vec<Delivery>, CourierError> {
    let inboxes = self.mailboxes.get_mut(&sink).ok_or(CourierError::NotASink(sink))?;

    let mut deliveries = Vec::new();
    let mut reclaimable = Vec::new();
    for (inbox, mailbox) in inboxes.iter_mut() {
      deliveries.extend(mailbox.drain().map(|message| Delivery::new(inbox.as_str(), message)));
      if mailbox.is_reclaimable() {
        reclaimable.push(inbox.clone());
      }
    }

    for inbox in reclaimable {
      inboxes.remove(&inbox);
      tracing::trace!(sink = %sink, inbox = %inbox, "PostOffice reclaimed drained mailbox");
    }
    if inboxes.is_empty() {
      self.mailboxes.remove(&sink);
    }

    tracing::trace!(sink = %sink, count = deliveries.len(), "PostOffice retrieved messages");
    Ok(deliveries)
  }
}

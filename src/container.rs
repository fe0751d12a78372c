// src/container.rs

//! Bundles coroutines with the links wiring them together.

use crate::coroutine::{CoroutineHandle, CoroutineId};
use crate::error::CourierError;
use crate::ports::{CONTROL, INBOX, OUTBOX, SIGNAL};
use crate::post_office::{IPostOffice, Link};
use crate::scheduler::Scheduler;

use std::collections::HashSet;

/// Links each adjacent pair of `coroutines` in order.
///
/// For every pair `(a, b)` this yields `a.outbox -> b.inbox` followed by
/// `a.signal -> b.control`, so data and shutdowns both flow downstream.
pub fn easy_link(coroutines: &[CoroutineHandle]) -> Vec<Link> {
  coroutines
    .windows(2)
    .flat_map(|pair| {
      let (source, sink) = (&pair[0], &pair[1]);
      [
        Link::new(source, OUTBOX, sink, INBOX),
        Link::new(source, SIGNAL, sink, CONTROL),
      ]
    })
    .collect()
}

/// A set of coroutines and the links between them, ready to be handed to a
/// post office and a scheduler.
#[derive(Debug, Clone, Default)]
pub struct Container {
  coroutines: Vec<CoroutineHandle>,
  links: Vec<Link>,
}

impl Container {
  /// Builds a container, rejecting any link with an endpoint outside of it.
  /// Duplicate coroutines and links are kept once.
  pub fn new(coroutines: Vec<CoroutineHandle>, links: Vec<Link>) -> Result<Self, CourierError> {
    let mut container = Self::default();
    container.absorb_coroutines(coroutines);
    let members: HashSet<CoroutineId> = container.coroutines.iter().map(CoroutineHandle::id).collect();
    for link in &links {
      if !members.contains(&link.source) || !members.contains(&link.sink) {
        return Err(CourierError::InvalidLink(link.clone()));
      }
    }
    container.absorb_links(links);
    Ok(container)
  }

  /// Chains `coroutines` in order with [`easy_link`].
  pub fn pipeline(coroutines: Vec<CoroutineHandle>) -> Result<Self, CourierError> {
    if coroutines.is_empty() {
      return Err(CourierError::InvalidArgument("a pipeline needs at least one coroutine".into()));
    }
    let links = easy_link(&coroutines);
    Self::new(coroutines, links)
  }

  /// Merges a sub-container into this one, skipping duplicates.
  pub fn nest(&mut self, other: Container) {
    self.absorb_coroutines(other.coroutines);
    self.absorb_links(other.links);
  }

  /// Adds links between members, typically between nested sub-containers.
  pub fn connect(&mut self, links: Vec<Link>) -> Result<(), CourierError> {
    for link in &links {
      if !self.contains(link.source) || !self.contains(link.sink) {
        return Err(CourierError::InvalidLink(link.clone()));
      }
    }
    self.absorb_links(links);
    Ok(())
  }

  pub fn coroutines(&self) -> &[CoroutineHandle] {
    &self.coroutines
  }

  pub fn links(&self) -> &[Link] {
    &self.links
  }

  pub fn contains(&self, id: CoroutineId) -> bool {
    self.coroutines.iter().any(|coroutine| coroutine.id() == id)
  }

  /// The first coroutine, e.g. the head of a pipeline.
  pub fn first(&self) -> Option<&CoroutineHandle> {
    self.coroutines.first()
  }

  /// The last coroutine, e.g. the tail of a pipeline.
  pub fn last(&self) -> Option<&CoroutineHandle> {
    self.coroutines.last()
  }

  pub fn into_parts(self) -> (Vec<CoroutineHandle>, Vec<Link>) {
    (self.coroutines, self.links)
  }

  /// Registers the links with the scheduler's post office, then the coroutines
  /// with the scheduler.
  pub fn register_with<P: IPostOffice>(&self, scheduler: &mut Scheduler<P>) -> Result<(), CourierError> {
    scheduler.post_office_mut().register(&self.links)?;
    scheduler.register(&self.coroutines)
  }

  fn absorb_coroutines(&mut self, coroutines: Vec<CoroutineHandle>) {
    for coroutine in coroutines {
      if !self.contains(coroutine.id()) {
        self.coroutines.push(coroutine);
      }
    }
  }

  fn absorb_links(&mut self, links: Vec<Link>) {
    for link in links {
      if !self.links.contains(&link) {
        self.links.push(link);
      }
    }
  }
}

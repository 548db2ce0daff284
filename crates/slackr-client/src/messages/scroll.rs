use slackr_api::messages::PAGE_SIZE;
use slackr_types::models::ChannelId;

/// Ticket for one older-page fetch, handed out by [`Paginator::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub channel_id: ChannelId,
    pub offset: usize,
    pub epoch: u64,
}

/// Infinite-scroll state for the open channel.
///
/// At most one page fetch is in flight. Every reset bumps `epoch`; answers
/// carrying an older epoch are stale and must be dropped.
#[derive(Debug, Default)]
pub struct Paginator {
    channel: Option<ChannelId>,
    offset: usize,
    has_more: bool,
    loading_more: bool,
    epoch: u64,
}

impl Paginator {
    /// Starts over for `channel` and returns the new epoch. Paging stays
    /// closed until the first page is recorded.
    pub fn reset(&mut self, channel: Option<ChannelId>) -> u64 {
        self.channel = channel;
        self.offset = 0;
        self.has_more = false;
        self.loading_more = false;
        self.epoch += 1;
        self.epoch
    }

    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading_more
    }

    /// Records the first page; older pages start right after it.
    pub fn first_page_loaded(&mut self, count: usize) {
        self.offset = PAGE_SIZE;
        self.has_more = count >= PAGE_SIZE;
    }

    /// Claims the in-flight slot. `None` while a fetch is running, when no
    /// channel is open, or once the history is exhausted.
    pub fn begin(&mut self) -> Option<PageRequest> {
        let channel_id = self.channel?;
        if self.loading_more || !self.has_more {
            return None;
        }
        self.loading_more = true;
        Some(PageRequest {
            channel_id,
            offset: self.offset,
            epoch: self.epoch,
        })
    }

    /// Returns false, leaving the state untouched, if `request` is stale.
    pub fn complete(&mut self, request: PageRequest, count: usize) -> bool {
        if !self.is_current(request.epoch) {
            return false;
        }
        self.loading_more = false;
        self.offset = request.offset + PAGE_SIZE;
        if count < PAGE_SIZE {
            self.has_more = false;
        }
        true
    }

    pub fn fail(&mut self, request: PageRequest) {
        if self.is_current(request.epoch) {
            self.loading_more = false;
        }
    }
}

/// Scroll offset that keeps the previously visible content in place after
/// `new_height - old_height` worth of older content was prepended.
pub fn restored_scroll_top(old_height: usize, new_height: usize) -> usize {
    new_height.saturating_sub(old_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_request_in_flight() {
        let mut pager = Paginator::default();
        pager.reset(Some(4));
        pager.first_page_loaded(PAGE_SIZE);

        let first = pager.begin().unwrap();
        assert_eq!(first.offset, PAGE_SIZE);
        assert!(pager.begin().is_none());

        assert!(pager.complete(first, PAGE_SIZE));
        let second = pager.begin().unwrap();
        assert_eq!(second.offset, 2 * PAGE_SIZE);
    }

    #[test]
    fn short_page_ends_history() {
        let mut pager = Paginator::default();
        pager.reset(Some(4));
        pager.first_page_loaded(PAGE_SIZE);

        let request = pager.begin().unwrap();
        assert!(pager.complete(request, 3));
        assert!(!pager.has_more());
        assert!(pager.begin().is_none());
    }

    #[test]
    fn short_first_page_means_nothing_older() {
        let mut pager = Paginator::default();
        pager.reset(Some(4));
        pager.first_page_loaded(10);
        assert!(pager.begin().is_none());
    }

    #[test]
    fn reset_makes_inflight_request_stale() {
        let mut pager = Paginator::default();
        pager.reset(Some(4));
        pager.first_page_loaded(PAGE_SIZE);
        let request = pager.begin().unwrap();

        pager.reset(Some(5));
        pager.first_page_loaded(PAGE_SIZE);
        assert!(!pager.complete(request, PAGE_SIZE));

        let fresh = pager.begin().unwrap();
        assert_eq!(fresh.channel_id, 5);
        assert_eq!(fresh.offset, PAGE_SIZE);
    }

    #[test]
    fn failure_releases_the_guard() {
        let mut pager = Paginator::default();
        pager.reset(Some(4));
        pager.first_page_loaded(PAGE_SIZE);
        let request = pager.begin().unwrap();
        pager.fail(request);
        assert_eq!(pager.begin(), Some(request));
    }

    #[test]
    fn no_paging_before_first_page() {
        let mut pager = Paginator::default();
        assert!(pager.begin().is_none());
        pager.reset(Some(4));
        assert!(pager.begin().is_none());
    }

    #[test]
    fn scroll_position_is_kept() {
        assert_eq!(restored_scroll_top(400, 900), 500);
        assert_eq!(restored_scroll_top(400, 300), 0);
    }
}

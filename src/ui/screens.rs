use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::db::{companies, estimates, layouts};
use crate::introduction::render_introduction;
use crate::models::{Company, Estimate, EstimateStatus, Layout, LayoutPreference, UserDetail};

/// Everything the home dashboard shows for the signed-in user.
pub(crate) struct HomeScreen {
    pub(crate) user: UserDetail,
    pub(crate) company: Option<Company>,
    pub(crate) layout: Option<LayoutPreference>,
    pub(crate) estimates: Vec<Estimate>,
    pub(crate) cursor: usize,
}

impl HomeScreen {
    pub(crate) fn load(conn: &Connection, user: UserDetail) -> Result<Self> {
        let company = companies::fetch_by_id(conn, user.company_id)
            .context("failed to load company for home screen")?;
        let layout = layouts::fetch_company_layout(conn, user.company_id)
            .context("failed to load saved layout")?;
        let estimates = estimates::fetch_by_company_id(conn, user.company_id)
            .context("failed to load estimates")?;
        Ok(Self {
            user,
            company,
            layout,
            estimates,
            cursor: 0,
        })
    }

    /// Re-read the estimate list, keeping the cursor on `focus` when given and
    /// otherwise clamping it to the new length.
    pub(crate) fn reload_estimates(
        &mut self,
        conn: &Connection,
        focus: Option<i64>,
    ) -> Result<()> {
        self.estimates = estimates::fetch_by_company_id(conn, self.user.company_id)
            .context("failed to reload estimates")?;

        let focused = focus.and_then(|id| self.estimates.iter().position(|e| e.id == id));
        self.cursor = match focused {
            Some(idx) => idx,
            None => self.cursor.min(self.estimates.len().saturating_sub(1)),
        };
        Ok(())
    }

    pub(crate) fn move_cursor(&mut self, offset: isize) {
        if self.estimates.is_empty() {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + offset;
        self.cursor = next.clamp(0, self.estimates.len() as isize - 1) as usize;
    }

    pub(crate) fn selected_estimate(&self) -> Option<&Estimate> {
        self.estimates.get(self.cursor)
    }
}

/// Status dropdown for one estimate, opened on the current status.
pub(crate) struct StatusPicker {
    pub(crate) estimate_id: i64,
    pub(crate) customer_name: String,
    pub(crate) cursor: usize,
}

impl StatusPicker {
    pub(crate) fn new(estimate: &Estimate) -> Self {
        let cursor = EstimateStatus::ALL
            .iter()
            .position(|status| *status == estimate.status)
            .unwrap_or(0);
        Self {
            estimate_id: estimate.id,
            customer_name: estimate.customer_name.clone(),
            cursor,
        }
    }

    pub(crate) fn move_cursor(&mut self, offset: isize) {
        let last = EstimateStatus::ALL.len() as isize - 1;
        self.cursor = (self.cursor as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn current(&self) -> EstimateStatus {
        EstimateStatus::ALL[self.cursor]
    }
}

/// Read-only view of an estimate with its introduction letter filled in.
pub(crate) struct EstimatePreview {
    pub(crate) title: String,
    pub(crate) summary: Vec<(&'static str, String)>,
    pub(crate) introduction: String,
}

impl EstimatePreview {
    pub(crate) fn new(estimate: &Estimate) -> Self {
        Self {
            title: format!("Estimate {}", estimate.quote_number),
            summary: vec![
                ("Customer", estimate.customer_name.clone()),
                ("Address", estimate.project_address.clone()),
                ("Date", estimate.quote_date.clone()),
                ("Total", estimate.formatted_total()),
                ("Status", estimate.status.to_string()),
            ],
            introduction: render_introduction(&estimate.introduction, estimate),
        }
    }
}

/// The two tabs of the layout dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LayoutTab {
    Mine,
    Shared,
}

/// State behind the "Change Layout" dialog. Only active layouts are listed,
/// split into the company's own layouts and shared ones.
pub(crate) struct LayoutPicker {
    pub(crate) company_id: i64,
    pub(crate) mine: Vec<Layout>,
    pub(crate) shared: Vec<Layout>,
    pub(crate) tab: LayoutTab,
    pub(crate) cursor: usize,
    pub(crate) selected_id: Option<i64>,
}

impl LayoutPicker {
    /// Pre-select the saved layout when it is still listed, otherwise the
    /// first of the company's own layouts, otherwise the first shared one.
    pub(crate) fn new(
        company_id: i64,
        layouts: Vec<Layout>,
        saved: Option<&LayoutPreference>,
    ) -> Self {
        let (shared, mine): (Vec<Layout>, Vec<Layout>) = layouts
            .into_iter()
            .filter(|layout| layout.is_active)
            .partition(|layout| layout.is_shared);

        let mut picker = Self {
            company_id,
            mine,
            shared,
            tab: LayoutTab::Mine,
            cursor: 0,
            selected_id: None,
        };

        let saved_id = saved.map(|pref| pref.layout_id);
        let initial = saved_id
            .filter(|id| picker.find(*id).is_some())
            .or_else(|| picker.mine.first().map(|l| l.id))
            .or_else(|| picker.shared.first().map(|l| l.id));

        if let Some(id) = initial {
            picker.focus(id);
        }
        picker
    }

    pub(crate) fn visible(&self) -> &[Layout] {
        match self.tab {
            LayoutTab::Mine => &self.mine,
            LayoutTab::Shared => &self.shared,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.mine.is_empty() && self.shared.is_empty()
    }

    /// Flip tabs, landing on the selected layout if it lives there.
    pub(crate) fn switch_tab(&mut self) {
        self.tab = match self.tab {
            LayoutTab::Mine => LayoutTab::Shared,
            LayoutTab::Shared => LayoutTab::Mine,
        };
        self.cursor = self
            .selected_id
            .and_then(|id| self.visible().iter().position(|l| l.id == id))
            .unwrap_or(0);
    }

    pub(crate) fn move_cursor(&mut self, offset: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + offset;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    pub(crate) fn current(&self) -> Option<&Layout> {
        self.visible().get(self.cursor)
    }

    /// Mark the highlighted layout as the chosen one.
    pub(crate) fn select_current(&mut self) -> Option<Layout> {
        let layout = self.current().cloned()?;
        self.selected_id = Some(layout.id);
        Some(layout)
    }

    fn find(&self, id: i64) -> Option<(LayoutTab, usize)> {
        if let Some(idx) = self.mine.iter().position(|l| l.id == id) {
            return Some((LayoutTab::Mine, idx));
        }
        self.shared
            .iter()
            .position(|l| l.id == id)
            .map(|idx| (LayoutTab::Shared, idx))
    }

    fn focus(&mut self, id: i64) {
        if let Some((tab, idx)) = self.find(id) {
            self.tab = tab;
            self.cursor = idx;
            self.selected_id = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::db::{initialize_database, user_details};

    fn layout(id: i64, is_active: bool, is_shared: bool) -> Layout {
        Layout {
            id,
            layout_name: format!("Layout {id}"),
            company_id: 1,
            is_active,
            is_shared,
        }
    }

    fn preference(layout_id: i64) -> LayoutPreference {
        LayoutPreference {
            company_id: 1,
            layout_id,
            layout_name: format!("Layout {layout_id}"),
            modified_date: String::new(),
        }
    }

    fn sample() -> Vec<Layout> {
        vec![
            layout(1, true, false),
            layout(2, true, false),
            layout(3, true, true),
            layout(4, false, true),
        ]
    }

    #[test]
    fn inactive_layouts_are_hidden_and_tabs_split_on_shared() {
        let picker = LayoutPicker::new(1, sample(), None);

        let mine: Vec<i64> = picker.mine.iter().map(|l| l.id).collect();
        let shared: Vec<i64> = picker.shared.iter().map(|l| l.id).collect();
        assert_eq!(mine, vec![1, 2]);
        assert_eq!(shared, vec![3]);
    }

    #[test]
    fn saved_shared_layout_opens_the_shared_tab() {
        let picker = LayoutPicker::new(1, sample(), Some(&preference(3)));

        assert_eq!(picker.tab, LayoutTab::Shared);
        assert_eq!(picker.selected_id, Some(3));
        assert_eq!(picker.current().map(|l| l.id), Some(3));
    }

    #[test]
    fn stale_preference_falls_back_to_first_own_layout() {
        let picker = LayoutPicker::new(1, sample(), Some(&preference(4)));

        assert_eq!(picker.tab, LayoutTab::Mine);
        assert_eq!(picker.selected_id, Some(1));
    }

    #[test]
    fn only_shared_layouts_selects_first_shared() {
        let picker = LayoutPicker::new(1, vec![layout(5, true, true)], None);

        assert_eq!(picker.tab, LayoutTab::Shared);
        assert_eq!(picker.selected_id, Some(5));
    }

    #[test]
    fn no_active_layouts_selects_nothing() {
        let mut picker = LayoutPicker::new(1, vec![layout(4, false, true)], None);

        assert!(picker.is_empty());
        assert!(picker.select_current().is_none());
        picker.move_cursor(1);
        assert_eq!(picker.cursor, 0);
    }

    #[test]
    fn cursor_is_clamped_and_selection_follows_tabs() {
        let mut picker = LayoutPicker::new(1, sample(), None);

        picker.move_cursor(5);
        assert_eq!(picker.current().map(|l| l.id), Some(2));
        picker.move_cursor(-9);
        assert_eq!(picker.current().map(|l| l.id), Some(1));

        picker.switch_tab();
        let chosen = picker.select_current().expect("shared layout");
        assert_eq!(chosen.id, 3);

        picker.switch_tab();
        picker.switch_tab();
        assert_eq!(picker.current().map(|l| l.id), Some(3));
    }

    #[test]
    fn status_picker_starts_on_the_current_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let conn = initialize_database(&StoreConfig::in_dir(dir.path())).expect("initialize");
        let accepted = estimates::fetch_by_id(&conn, 3)
            .expect("fetch")
            .expect("seeded estimate");

        let mut picker = StatusPicker::new(&accepted);
        assert_eq!(picker.current(), EstimateStatus::Accepted);

        picker.move_cursor(10);
        assert_eq!(picker.current(), EstimateStatus::Cancelled);
        picker.move_cursor(-10);
        assert_eq!(picker.current(), EstimateStatus::Provided);
    }

    #[test]
    fn home_cursor_follows_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let conn = initialize_database(&StoreConfig::in_dir(dir.path())).expect("initialize");
        let admin = user_details::fetch_by_id(&conn, 1)
            .expect("fetch")
            .expect("admin seeded");
        let mut home = HomeScreen::load(&conn, admin).expect("load home");

        let ids: Vec<i64> = home.estimates.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        home.move_cursor(5);
        assert_eq!(home.selected_estimate().map(|e| e.id), Some(3));

        estimates::delete(&conn, 3).expect("delete");
        home.reload_estimates(&conn, None).expect("reload");
        assert_eq!(home.selected_estimate().map(|e| e.id), Some(2));

        let copy = estimates::duplicate(&conn, 1).expect("duplicate");
        home.reload_estimates(&conn, Some(copy.id)).expect("reload");
        assert_eq!(home.selected_estimate().map(|e| e.id), Some(copy.id));
    }
}

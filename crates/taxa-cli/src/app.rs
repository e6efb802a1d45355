//! Application state machine and event dispatcher.

use std::{future::Future, sync::Arc};

use anyhow::bail;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taxa_core::{
  Error,
  notice::Notice,
  pending::{ActionControl, PendingGuard},
  profile::Profile,
  search,
  session::Session,
  species::Species,
};

use tokio::sync::mpsc;

use crate::{
  client::ApiClient,
  form::{FormMode, SpeciesForm},
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the species list; right pane previews the cursor row.
  SpeciesList,
  /// Focus on the detail pane of the selected species.
  SpeciesDetail,
  /// The add/edit form.
  Form,
  /// The delete confirmation prompt over the detail pane.
  ConfirmDelete,
  /// The user directory.
  Users,
  /// Editing the caller's own biography.
  BioEditor,
}

/// One [`ActionControl`] per mutating trigger.
#[derive(Default)]
pub struct Controls {
  pub submit:    ActionControl,
  pub delete:    ActionControl,
  pub biography: ActionControl,
}

// ─── Completions ──────────────────────────────────────────────────────────────

/// What a background request came back with.
#[derive(Debug)]
pub enum Outcome {
  Saved { mode: FormMode, result: taxa_core::Result<Species> },
  Deleted(taxa_core::Result<()>),
  Biography(taxa_core::Result<Profile>),
}

/// A finished request. Carries the control's guard, so the control stays
/// pending until the outcome has been applied.
#[derive(Debug)]
pub struct Completion {
  outcome: Outcome,
  guard:   PendingGuard,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// The signed-in user.
  pub session: Session,

  /// The signed-in user's profile, if they have one.
  pub me: Option<Profile>,

  /// All species returned by the last fetch, newest first.
  pub species: Vec<Species>,

  /// Current search text.
  pub query: String,

  /// Whether the user is typing into the search box.
  pub search_active: bool,

  /// Cursor position within the *filtered* species list.
  pub list_cursor: usize,

  /// Id of the species open in the detail pane.
  pub selected_id: Option<i64>,

  /// The open add/edit form.
  pub form: Option<SpeciesForm>,

  /// Every profile, for the user directory.
  pub profiles: Vec<Profile>,

  /// Cursor position within `profiles`.
  pub profile_cursor: usize,

  /// Text of the biography editor.
  pub bio_draft: String,

  /// Outcome of the last action, shown in the status bar until the next key.
  pub notice: Option<Notice>,

  pub controls: Controls,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,

  completions_tx: mpsc::UnboundedSender<Completion>,
  completions:    mpsc::UnboundedReceiver<Completion>,
}

impl App {
  pub fn new(client: ApiClient, session: Session) -> Self {
    let (completions_tx, completions) = mpsc::unbounded_channel();
    Self {
      screen: Screen::SpeciesList,
      session,
      me: None,
      species: Vec::new(),
      query: String::new(),
      search_active: false,
      list_cursor: 0,
      selected_id: None,
      form: None,
      profiles: Vec::new(),
      profile_cursor: 0,
      bio_draft: String::new(),
      notice: None,
      controls: Controls::default(),
      client: Arc::new(client),
      completions_tx,
      completions,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch every species. A missing session ends the program with
  /// "sign-in required"; any other failure becomes an error notice.
  pub async fn load_species(&mut self) -> anyhow::Result<()> {
    match self.client.list_species().await {
      Ok(species) => {
        self.species = species;
        self.clamp_list_cursor();
        Ok(())
      }
      Err(Error::Unauthenticated) => bail!("sign-in required"),
      Err(e) => {
        self.notice = Some(Notice::from_error("Error", &e));
        Ok(())
      }
    }
  }

  /// Fetch the caller's own profile. Absence is not an error.
  pub async fn load_me(&mut self) {
    self.me = self.client.me().await.ok();
  }

  async fn load_profiles(&mut self) -> anyhow::Result<()> {
    match self.client.list_profiles().await {
      Ok(profiles) => {
        self.profiles = profiles;
        self.profile_cursor = self.profile_cursor.min(self.profiles.len().saturating_sub(1));
        Ok(())
      }
      Err(Error::Unauthenticated) => bail!("sign-in required"),
      Err(e) => {
        self.notice = Some(Notice::from_error("Error", &e));
        Ok(())
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Species matching the current search text, in list order.
  pub fn filtered_species(&self) -> Vec<&Species> {
    search::search(&self.query, &self.species)
  }

  /// The species under the list cursor in the filtered view, if any.
  pub fn cursor_species(&self) -> Option<&Species> {
    self.filtered_species().get(self.list_cursor).copied()
  }

  /// The species open in the detail pane, if it still exists.
  pub fn selected_species(&self) -> Option<&Species> {
    let id = self.selected_id?;
    self.species.iter().find(|s| s.id == id)
  }

  fn clamp_list_cursor(&mut self) {
    let len = self.filtered_species().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  /// Whether the profile under the directory cursor is the caller's own.
  pub fn cursor_profile_is_mine(&self) -> bool {
    self
      .profiles
      .get(self.profile_cursor)
      .is_some_and(|p| p.id == self.session.user_id)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    self.notice = None;

    if self.search_active {
      self.handle_search_key(key);
      return Ok(true);
    }

    match self.screen {
      Screen::SpeciesList => return self.handle_list_key(key).await,
      Screen::SpeciesDetail => return self.handle_detail_key(key),
      Screen::Form => self.handle_form_key(key),
      Screen::ConfirmDelete => self.handle_confirm_key(key),
      Screen::Users => return self.handle_users_key(key).await,
      Screen::BioEditor => self.handle_bio_key(key),
    }
    Ok(true)
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.query.clear();
      }
      KeyCode::Enter => {
        self.search_active = false;
        // Open straight away when exactly one species matches.
        let only = match self.filtered_species().as_slice() {
          [only] => Some(only.id),
          _ => None,
        };
        if let Some(id) = only {
          self.open_detail(id);
        }
      }
      KeyCode::Backspace => {
        self.query.pop();
      }
      KeyCode::Char(c) => self.query.push(c),
      _ => {}
    }
    self.list_cursor = 0;
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_species().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_species().map(|s| s.id) {
          self.open_detail(id);
        }
      }

      KeyCode::Char('/') => {
        self.search_active = true;
        self.list_cursor = 0;
      }
      KeyCode::Char('a') => {
        self.form = Some(SpeciesForm::add());
        self.screen = Screen::Form;
      }
      KeyCode::Char('r') => self.load_species().await?,
      KeyCode::Char('u') => {
        self.load_profiles().await?;
        self.screen = Screen::Users;
      }
      _ => {}
    }
    Ok(true)
  }

  fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::SpeciesList;
        self.selected_id = None;
      }
      KeyCode::Char('e') => {
        if let Some(species) = self.selected_species() {
          self.form = Some(SpeciesForm::edit(species));
          self.screen = Screen::Form;
        }
      }
      KeyCode::Char('d') if self.selected_species().is_some() => {
        self.screen = Screen::ConfirmDelete;
      }
      _ => {}
    }
    Ok(true)
  }

  /// Ignored while a save is in flight.
  fn handle_form_key(&mut self, key: KeyEvent) {
    if self.controls.submit.is_pending() {
      return;
    }
    let Some(form) = self.form.as_mut() else {
      self.screen = Screen::SpeciesList;
      return;
    };
    match key.code {
      KeyCode::Esc => self.close_form(),
      KeyCode::Enter => self.submit_form(),
      KeyCode::Tab | KeyCode::Down => form.focus_next(),
      KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
      KeyCode::Left => form.cycle_kingdom(-1),
      KeyCode::Right => form.cycle_kingdom(1),
      KeyCode::Backspace => form.pop_char(),
      KeyCode::Char(c) => form.push_char(c),
      _ => {}
    }
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    if self.controls.delete.is_pending() {
      return;
    }
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => self.delete_selected(),
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
        self.screen = Screen::SpeciesDetail;
      }
      _ => {}
    }
  }

  async fn handle_users_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::SpeciesList;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if self.profile_cursor + 1 < self.profiles.len() {
          self.profile_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.profile_cursor = self.profile_cursor.saturating_sub(1);
      }
      KeyCode::Char('r') => self.load_profiles().await?,
      KeyCode::Enter | KeyCode::Char('e') if self.cursor_profile_is_mine() => {
        self.bio_draft = self.profiles[self.profile_cursor]
          .biography
          .clone()
          .unwrap_or_default();
        self.screen = Screen::BioEditor;
      }
      _ => {}
    }
    Ok(true)
  }

  fn handle_bio_key(&mut self, key: KeyEvent) {
    if self.controls.biography.is_pending() {
      return;
    }
    match key.code {
      KeyCode::Esc => self.screen = Screen::Users,
      KeyCode::Enter => self.save_biography(),
      KeyCode::Backspace => {
        self.bio_draft.pop();
      }
      KeyCode::Char(c) => self.bio_draft.push(c),
      _ => {}
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  fn open_detail(&mut self, id: i64) {
    self.selected_id = Some(id);
    self.screen = Screen::SpeciesDetail;
  }

  fn close_form(&mut self) {
    let mode = self.form.take().map(|f| f.mode);
    self.screen = match mode {
      Some(FormMode::Edit(_)) => Screen::SpeciesDetail,
      _ => Screen::SpeciesList,
    };
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Run `request` on its own task while `control` is pending. The event
  /// loop keeps drawing, and picks the outcome up through
  /// [`App::apply_completions`]. Does nothing if `control` is already
  /// pending.
  fn spawn<F>(&self, control: &ActionControl, request: F)
  where
    F: Future<Output = Outcome> + Send + 'static,
  {
    let Some(guard) = control.try_begin() else {
      return;
    };
    let tx = self.completions_tx.clone();
    tokio::spawn(async move {
      let outcome = request.await;
      // A closed channel means the app has quit.
      tx.send(Completion { outcome, guard }).ok();
    });
  }

  /// Validate the form locally, then create or update in the background.
  fn submit_form(&mut self) {
    let Some(form) = self.form.as_mut() else { return };
    let Some(input) = form.submit_input() else { return };
    let mode = form.mode;

    let client = Arc::clone(&self.client);
    self.spawn(&self.controls.submit, async move {
      let result = match mode {
        FormMode::Add => client.create_species(&input).await,
        FormMode::Edit(id) => client.update_species(id, &input).await,
      };
      Outcome::Saved { mode, result }
    });
  }

  /// Runs only after the user answered the prompt with yes.
  fn delete_selected(&mut self) {
    let Some(id) = self.selected_id else {
      self.screen = Screen::SpeciesList;
      return;
    };
    let client = Arc::clone(&self.client);
    self.spawn(&self.controls.delete, async move {
      Outcome::Deleted(client.delete_species(id).await)
    });
  }

  fn save_biography(&mut self) {
    let id = self.session.user_id;
    let client = Arc::clone(&self.client);
    let draft = self.bio_draft.clone();
    self.spawn(&self.controls.biography, async move {
      Outcome::Biography(client.update_biography(id, &draft).await)
    });
  }

  /// Apply every request that has finished since the last frame.
  pub async fn apply_completions(&mut self) -> anyhow::Result<()> {
    while let Ok(done) = self.completions.try_recv() {
      self.complete(done).await?;
    }
    Ok(())
  }

  async fn complete(&mut self, done: Completion) -> anyhow::Result<()> {
    let Completion { outcome, guard } = done;
    match outcome {
      Outcome::Saved { mode, result } => self.finish_submit(mode, result).await?,
      Outcome::Deleted(result) => self.finish_delete(result).await?,
      Outcome::Biography(result) => self.finish_biography(result).await?,
    }
    drop(guard);
    Ok(())
  }

  /// Server-side field errors land back on the form; other failures become
  /// a notice.
  async fn finish_submit(
    &mut self,
    mode: FormMode,
    result: taxa_core::Result<Species>,
  ) -> anyhow::Result<()> {
    match result {
      Ok(species) => {
        tracing::debug!(id = species.id, "species saved");
        self.notice = Some(Notice::success(match mode {
          FormMode::Add => "Species added successfully!",
          FormMode::Edit(_) => "Species updated successfully!",
        }));
        self.form = None;
        self.open_detail(species.id);
        self.load_species().await?;
      }
      Err(Error::Validation(fields)) => {
        if let Some(form) = self.form.as_mut() {
          form.errors = fields;
        }
      }
      Err(e) => {
        let title = match mode {
          FormMode::Add => "Error adding species",
          FormMode::Edit(_) => "Error updating species",
        };
        self.notice = Some(Notice::from_error(title, &e));
      }
    }
    Ok(())
  }

  async fn finish_delete(&mut self, result: taxa_core::Result<()>) -> anyhow::Result<()> {
    match result {
      Ok(()) => {
        self.notice = Some(Notice::success("Species deleted successfully."));
        self.selected_id = None;
        self.screen = Screen::SpeciesList;
        self.load_species().await?;
      }
      Err(e) => {
        self.notice = Some(Notice::from_error("Error", &e));
        self.screen = Screen::SpeciesDetail;
      }
    }
    Ok(())
  }

  async fn finish_biography(
    &mut self,
    result: taxa_core::Result<Profile>,
  ) -> anyhow::Result<()> {
    match result {
      Ok(profile) => {
        self.notice = Some(Notice::success("Biography updated."));
        self.me = Some(profile);
        self.screen = Screen::Users;
        self.load_profiles().await?;
      }
      Err(e) => {
        self.notice = Some(Notice::from_error("Error updating biography", &e));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::ApiConfig;
  use taxa_core::{catalog::DELETE_PROMPT, species::Kingdom, validate::SpeciesField};
  use uuid::Uuid;

  /// Points at a closed port: any request that slips through fails loudly.
  fn app() -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:9".into(),
      username: "ada".into(),
      password: "secret".into(),
    })
    .unwrap();
    let mut app = App::new(client, Session { user_id: Uuid::new_v4() });
    app.species = vec![
      species(3, "Quercus robur", Some("English oak")),
      species(2, "Panthera tigris", Some("Tiger")),
      species(1, "Panthera leo", Some("Lion")),
    ];
    app
  }

  fn species(id: i64, name: &str, common: Option<&str>) -> Species {
    Species {
      id,
      scientific_name: name.into(),
      common_name: common.map(Into::into),
      kingdom: Kingdom::Animalia,
      total_population: None,
      description: None,
      endangered: false,
      author: Uuid::new_v4(),
      image: None,
      author_profile: None,
    }
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn type_keys(app: &mut App, text: &str) {
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
  }

  /// Wait for the next background request to finish and apply it.
  async fn settle(app: &mut App) {
    let done = app.completions.recv().await.unwrap();
    app.complete(done).await.unwrap();
  }

  #[tokio::test]
  async fn search_filters_on_every_keystroke() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    type_keys(&mut app, "pan").await;
    assert_eq!(app.filtered_species().len(), 2);

    type_keys(&mut app, "thera l").await;
    let names: Vec<_> = app.filtered_species().iter().map(|s| s.id).collect();
    assert_eq!(names, [1]);

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert!(app.query.is_empty());
    assert_eq!(app.filtered_species().len(), 3);
  }

  #[tokio::test]
  async fn enter_on_single_match_opens_detail() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    type_keys(&mut app, "oak").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.screen, Screen::SpeciesDetail);
    assert_eq!(app.selected_species().map(|s| s.id), Some(3));
  }

  #[tokio::test]
  async fn invalid_form_never_sends() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    assert_eq!(app.screen, Screen::Form);

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.errors.get(SpeciesField::ScientificName), Some("is required"));
    assert!(app.notice.is_none());
    assert_eq!(app.screen, Screen::Form);
  }

  #[tokio::test]
  async fn declining_delete_returns_to_detail() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
    assert_eq!(app.screen, Screen::ConfirmDelete);
    assert!(DELETE_PROMPT.contains("cannot be undone"));

    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert_eq!(app.screen, Screen::SpeciesDetail);
    assert_eq!(app.species.len(), 3);
    assert!(!app.controls.delete.is_pending());
  }

  #[tokio::test]
  async fn failed_delete_shows_error_and_resets_control() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('y'))).await.unwrap();
    assert!(app.controls.delete.is_pending());
    assert_eq!(app.screen, Screen::ConfirmDelete);

    // The prompt is frozen until the request comes back.
    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert_eq!(app.screen, Screen::ConfirmDelete);

    settle(&mut app).await;
    let notice = app.notice.as_ref().unwrap();
    assert!(notice.is_error());
    assert_eq!(notice.title, "Error");
    assert_eq!(app.screen, Screen::SpeciesDetail);
    assert_eq!(app.species.len(), 3);
    assert!(!app.controls.delete.is_pending());
  }

  #[tokio::test]
  async fn pending_control_refuses_a_second_submit() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    type_keys(&mut app, "Panthera onca").await;

    let _held = app.controls.submit.try_begin().unwrap();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.notice.is_none());
    assert_eq!(app.screen, Screen::Form);
    assert!(app.completions.try_recv().is_err());
  }

  #[tokio::test]
  async fn keys_during_a_save_do_not_send_it_again() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    type_keys(&mut app, "Panthera onca").await;

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.controls.submit.is_pending());

    // Typed while the request is in flight.
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    type_keys(&mut app, "xyz").await;
    assert_eq!(app.form.as_ref().unwrap().scientific_name, "Panthera onca");

    settle(&mut app).await;
    let notice = app.notice.as_ref().unwrap();
    assert!(notice.is_error());
    assert_eq!(notice.title, "Error adding species");
    assert_eq!(app.screen, Screen::Form);
    assert!(!app.controls.submit.is_pending());
    assert!(app.completions.try_recv().is_err());

    // Idle again: the next Enter is a fresh attempt.
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.controls.submit.is_pending());
    settle(&mut app).await;
  }

  #[tokio::test]
  async fn failed_biography_save_keeps_the_editor_open() {
    let mut app = app();
    let me = app.session.user_id;
    app.profiles = vec![Profile { id: me, email: "ada@example.com".into(), display_name: None, biography: None }];
    app.screen = Screen::Users;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    type_keys(&mut app, "Botanist").await;

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.controls.biography.is_pending());
    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.screen, Screen::BioEditor);

    settle(&mut app).await;
    assert_eq!(app.notice.as_ref().unwrap().title, "Error updating biography");
    assert_eq!(app.screen, Screen::BioEditor);
    assert_eq!(app.bio_draft, "Botanist");
    assert!(!app.controls.biography.is_pending());
  }

  #[tokio::test]
  async fn only_own_profile_opens_bio_editor() {
    let mut app = app();
    let me = app.session.user_id;
    app.profiles = vec![
      Profile { id: Uuid::new_v4(), email: "bob@example.com".into(), display_name: None, biography: None },
      Profile { id: me, email: "ada@example.com".into(), display_name: None, biography: Some("Botanist".into()) },
    ];
    app.screen = Screen::Users;

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.screen, Screen::Users);

    app.handle_key(key(KeyCode::Down)).await.unwrap();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.screen, Screen::BioEditor);
    assert_eq!(app.bio_draft, "Botanist");
  }
}

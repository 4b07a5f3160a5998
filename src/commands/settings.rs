use chrono::NaiveDate;

use super::CommandResult;
use crate::body::{self, BodyMetric, BodyStat};
use crate::db::AppState;
use crate::equipment::{Equipment, PlateLoad};
use crate::state::AppSettings;

/// ---------------------------------------------------------------------------
/// Equipment
/// ---------------------------------------------------------------------------

pub async fn get_equipment(state: &AppState) -> CommandResult<Equipment> {
  Ok(state.data.lock().await.equipment.clone())
}

pub async fn update_equipment(state: &AppState, barbell_weight: f64, plates: Vec<f64>) -> CommandResult<Equipment> {
  let equipment = Equipment::new(barbell_weight, &plates)?;

  let mut data = state.data.lock().await;
  let mut next = data.clone();
  next.equipment = equipment.clone();
  next.persist_equipment(&state.store).await?;
  *data = next;
  tracing::info!(barbell_weight, plates = equipment.available_plates.len(), "Updated equipment");
  Ok(equipment)
}

pub async fn plate_breakdown(state: &AppState, target_weight: f64) -> CommandResult<PlateLoad> {
  let data = state.data.lock().await;
  Ok(data.equipment.plate_breakdown(target_weight)?)
}

/// ---------------------------------------------------------------------------
/// Body Stats
/// ---------------------------------------------------------------------------

pub async fn get_body_stats(state: &AppState) -> CommandResult<Vec<BodyStat>> {
  Ok(state.data.lock().await.body_stats.clone())
}

pub async fn save_body_stat(state: &AppState, stat: BodyStat) -> CommandResult<()> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  body::upsert_body_stat(&mut next.body_stats, stat)?;
  next.persist_body_stats(&state.store).await?;
  *data = next;
  Ok(())
}

pub async fn delete_body_stat(state: &AppState, date: NaiveDate) -> CommandResult<()> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  body::delete_body_stat(&mut next.body_stats, date)?;
  next.persist_body_stats(&state.store).await?;
  *data = next;
  Ok(())
}

pub async fn body_metric_series(state: &AppState, metric: BodyMetric) -> CommandResult<Vec<(NaiveDate, f64)>> {
  let data = state.data.lock().await;
  Ok(body::metric_series(&data.body_stats, metric))
}

/// ---------------------------------------------------------------------------
/// App Settings
/// ---------------------------------------------------------------------------

pub async fn get_app_settings(state: &AppState) -> CommandResult<AppSettings> {
  Ok(state.data.lock().await.settings)
}

pub async fn update_app_settings(state: &AppState, settings: AppSettings) -> CommandResult<AppSettings> {
  let mut data = state.data.lock().await;
  let mut next = data.clone();
  next.settings = settings;
  next.persist_settings(&state.store).await?;
  *data = next;
  Ok(settings)
}

/// Rest timer length configured for this install
pub async fn rest_timer_seconds(state: &AppState) -> CommandResult<Option<u32>> {
  let data = state.data.lock().await;
  Ok(data.settings.use_rest_timer.then_some(state.config.rest_timer_seconds))
}

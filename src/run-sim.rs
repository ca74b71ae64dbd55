mod common;

use std::{env, error::Error, fmt, str::FromStr, time::Duration};

use bevy::{app::ScheduleRunnerPlugin, input::InputPlugin, log::LogPlugin, prelude::*};

use common::{
    components::{patrol::Patrol, rewinder::Rewinder, *},
    message::DayRewound,
    plugins::rewind::{RewindPlugin, RewindSet},
    puzzle::{maze::{maze_seed, Maze}, riddle::Riddle},
    resources::{
        config::{delta_from_millis, RewindConfig},
        day_clock::DayClock,
        daylight::Daylight,
        gate::InteractionGate,
    },
    save::SaveSlot,
    systems::save::{autosave, restore},
};

/// How long the sim spends on each riddle. The day clock holds meanwhile.
const READING_TIME: Duration = Duration::from_secs(1);

/// Stop after this many rewound days, from `CHRONO_DAYS`; runs forever when unset.
#[derive(Clone, Copy, Debug, Default, Resource)]
struct DayLimit(Option<u32>);

/// The riddle on screen, if any, and how long it has been up.
#[derive(Debug, Default, Resource)]
struct RiddleDialog(Option<Timer>);

impl RiddleDialog {
    fn open(&mut self, gate: &mut InteractionGate) {
        gate.block();
        self.0 = Some(Timer::new(READING_TIME, TimerMode::Once));
    }
}

fn env_var<T>(name: &str) -> Result<Option<T>, Box<dyn Error>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(value) => Ok(Some(value.trim().parse::<T>().map_err(|err| format!("{name}={value}: {err}"))?)),
        Err(_) => Ok(None),
    }
}

/// Defaults overridden by `CHRONO_DAY_MINUTES`, `CHRONO_SAMPLE_MS`,
/// `CHRONO_REWIND_SPEED`, `CHRONO_HISTORY` and `CHRONO_CLOCK` (true/false).
fn config_from_env() -> Result<RewindConfig, Box<dyn Error>> {
    let mut config = RewindConfig::default();
    if let Some(minutes) = env_var::<f32>("CHRONO_DAY_MINUTES")? {
        config = config.with_day_minutes(minutes);
    }
    if let Some(ms) = env_var::<f64>("CHRONO_SAMPLE_MS")? {
        config = config.with_sampling_interval(delta_from_millis(ms));
    }
    if let Some(speed) = env_var::<f32>("CHRONO_REWIND_SPEED")? {
        config = config.with_rewind_multiplier(speed);
    }
    if let Some(max_history) = env_var::<usize>("CHRONO_HISTORY")? {
        let overflow = config.overflow;
        config = config.with_history(max_history, overflow);
    }
    if let Some(enabled) = env_var::<bool>("CHRONO_CLOCK")? {
        config = config.with_enabled(enabled);
    }
    Ok(config)
}

fn spawn_player(mut commands: Commands, config: Res<RewindConfig>) {
    commands.spawn((
        Player,
        Patrol::new(config.walk_speed, Duration::from_secs(3)),
        Transform::from_xyz(PLAYER_START.x, PLAYER_START.y, 0.),
        Velocity::default(),
        Rewinder::new(config.max_history, config.overflow),
        Home(PLAYER_START),
    ));
}

fn report_puzzles(clock: &DayClock) {
    let riddle = Riddle::for_day(clock);
    let maze = Maze::for_day(clock);
    let steps = maze.solution().map_or(0, |path| path.len());
    info!("day {}: riddle \"{}\" [{}]", clock.rewind_count(), riddle.question, riddle.options.join(" / "));
    info!(
        "day {}: {}x{} maze, seed {:#018x}, shortest route {steps} cells",
        clock.rewind_count(),
        maze.width(),
        maze.height(),
        maze_seed(clock)
    );
}

fn report_first_day(clock: Res<DayClock>, mut dialog: ResMut<RiddleDialog>, mut gate: ResMut<InteractionGate>) {
    info!("each day lasts {:?}", clock.day_duration());
    report_puzzles(&clock);
    dialog.open(&mut gate);
}

fn report_new_day(
    mut reader: EventReader<DayRewound>,
    clock: Res<DayClock>,
    daylight: Res<Daylight>,
    limit: Res<DayLimit>,
    mut dialog: ResMut<RiddleDialog>,
    mut gate: ResMut<InteractionGate>,
    mut exit: EventWriter<AppExit>,
) {
    if reader.read().last().is_none() {
        return;
    }
    let face = clock.time_of_day();
    info!("it is {face} again (hand at {:.0} degrees), {:?} outside", face.hand_angle(), daylight.phase());

    if limit.0.is_some_and(|days| clock.rewind_count() >= days) {
        info!("day limit reached, exiting");
        exit.write(AppExit::Success);
        return;
    }
    report_puzzles(&clock);
    dialog.open(&mut gate);
}

/// Once the reading time is up, guess an option and let the day run again.
fn answer_riddle(
    time: Res<Time>,
    clock: Res<DayClock>,
    mut dialog: ResMut<RiddleDialog>,
    mut gate: ResMut<InteractionGate>,
) {
    let Some(timer) = dialog.0.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).finished() {
        return;
    }

    let riddle = Riddle::for_day(&*clock);
    let guess = riddle.options[clock.rewind_count() as usize % riddle.options.len()];
    if riddle.is_correct(guess) {
        info!("guessed \"{guess}\": correct");
    } else {
        info!("guessed \"{guess}\": wrong, it was \"{}\"", riddle.answer);
    }
    dialog.0 = None;
    gate.unblock();
}

fn add_sim_systems(app: &mut App) {
    app.init_resource::<RiddleDialog>();
    app.add_systems(Startup, (spawn_player, restore, report_first_day).chain());
    app.add_systems(
        Update,
        (
            answer_riddle.before(RewindSet::Clock),
            // Saved before motion so the player is exactly where the day reset put them
            autosave.after(RewindSet::Clock).before(RewindSet::Motion),
            report_new_day.after(RewindSet::Motion),
        ),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = config_from_env()?;
    let limit = env_var::<u32>("CHRONO_DAYS")?;
    let frame = env_var::<f64>("CHRONO_FRAME_MS")?.map_or(Duration::from_secs_f64(1. / 60.), delta_from_millis);

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)),
        LogPlugin {
            level: bevy::log::Level::DEBUG,
            filter: "wgpu=error,bevy=warn,".to_owned() + "sim=info,",
            ..default()
        },
        InputPlugin,
        RewindPlugin::new(config)?,
    ));

    app.insert_resource(SaveSlot::from_env());
    app.insert_resource(DayLimit(limit));
    add_sim_systems(&mut app);

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(format!("sim exited with code {code}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{components::history::OverflowPolicy, save::ActorSave};

    fn sim(slot: SaveSlot) -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        let config = RewindConfig::default().with_day_duration(Duration::from_secs(1));
        app.add_plugins(RewindPlugin::new(config).unwrap());
        app.insert_resource(slot);
        app.insert_resource(DayLimit(None));
        add_sim_systems(&mut app);
        app
    }

    fn frame(app: &mut App) {
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(100));
        app.update();
    }

    #[test]
    fn test_player_spawns_at_start() {
        let mut app = App::new();
        app.init_resource::<RewindConfig>();
        app.add_systems(Startup, spawn_player);
        app.update();

        let mut query = app.world_mut().query_filtered::<(&Transform, &Home, &Rewinder), With<Player>>();
        let (transform, home, rewinder) = query.single(app.world()).unwrap();
        assert_eq!(transform.translation.truncate(), PLAYER_START);
        assert_eq!(home.0, PLAYER_START);
        assert_eq!(rewinder.history().capacity(), RewindConfig::default().max_history);
        assert_eq!(rewinder.history().policy(), OverflowPolicy::KeepOldest);
    }

    #[test]
    fn test_autosave_lands_on_reset_position() {
        let dir = tempfile::tempdir().unwrap();
        let slot = SaveSlot::new(dir.path().join("save.bin"));
        let mut app = sim(slot.clone());

        let mut frames = 0;
        while app.world().resource::<DayClock>().rewind_count() == 0 {
            frame(&mut app);
            frames += 1;
            assert!(frames < 200, "day never rewound");
        }

        // The patrol moves the player again in the same frame, after the save
        let save = slot.load().unwrap().unwrap();
        assert_eq!(save.rewind_count, 1);
        assert_eq!(save.player, ActorSave { x: PLAYER_START.x, y: PLAYER_START.y });
        let mut players = app.world_mut().query_filtered::<&Transform, With<Player>>();
        let moved = players.single(app.world()).unwrap().translation.truncate();
        assert_ne!(moved, PLAYER_START);
    }

    #[test]
    fn test_riddle_holds_the_clock() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = sim(SaveSlot::new(dir.path().join("save.bin")));

        frame(&mut app);
        assert!(app.world().resource::<InteractionGate>().is_blocking());
        assert_eq!(app.world().resource::<DayClock>().current_time(), Duration::ZERO);

        // Ten 100ms frames finish the reading time; the clock runs again in that frame
        for _ in 0..9 {
            frame(&mut app);
        }
        assert!(!app.world().resource::<InteractionGate>().is_blocking());
        assert!(app.world().resource::<RiddleDialog>().0.is_none());
        assert_eq!(app.world().resource::<DayClock>().current_time(), Duration::from_millis(100));
    }
}

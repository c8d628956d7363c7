//! The day-by-day event loop (§4.4): the simulator's core. Single
//! threaded, deterministic given the same config, dataset, and strategy
//! set — no wall-clock reads, no RNG draws inside the loop itself.

use crate::analyzer::greeks::{self, PortfolioGreeksPoint};
use crate::config::{BacktestConfig, PositionSizingConfig};
use crate::model::bar::UnderlyingBar;
use crate::model::equity::{DailyEntryLog, EquityPoint};
use crate::model::position::Position;
use crate::model::trade::TradeRecord;
use crate::model::types::{EntryBlockedReason, PositionStatus};
use crate::simulator::costs;
use crate::simulator::dataset::Dataset;
use crate::strategies::base::Strategy;
use crate::strategies::mark::mark_spread;
use crate::strategies::positive_from_decimal;
use crate::strategies::{AccountState, KellyStats, RiskBudget};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Everything the simulator produced over a run (§3): the closed trades,
/// the daily equity curve, and the per-strategy per-day entry audit log.
#[derive(Debug, Clone, Default)]
pub struct SimulatorOutput {
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    pub daily_entry_log: Vec<DailyEntryLog>,
}

impl SimulatorOutput {
    /// Open positions at the end of the run — never settled because the
    /// dataset ended first. Not a failure: a run's final snapshot still
    /// reports them via the last `EquityPoint`'s `positions_value`.
    pub fn trades_by_strategy(&self, strategy_id: &str) -> impl Iterator<Item = &TradeRecord> {
        self.trades.iter().filter(move |t| t.strategy_id == strategy_id)
    }
}

/// Day-by-day backtest engine (§4.4). Owns the strategy set for the
/// duration of one run; a fresh `Simulator` is built per optimizer trial
/// so trials never share mutable state.
pub struct Simulator {
    strategies: Vec<Box<dyn Strategy>>,
    backtest: BacktestConfig,
    sizing: PositionSizingConfig,
    kelly_stats: HashMap<String, KellyStats>,
}

impl Simulator {
    pub fn new(strategies: Vec<Box<dyn Strategy>>, backtest: BacktestConfig, sizing: PositionSizingConfig) -> Self {
        Simulator { strategies, backtest, sizing, kelly_stats: HashMap::new() }
    }

    /// Supplies prior-run win-rate/payoff-ratio statistics for Kelly
    /// sizing (§4.3.4); strategies not present here size to zero under
    /// `SizingMethod::Kelly`.
    pub fn with_kelly_stats(mut self, kelly_stats: HashMap<String, KellyStats>) -> Self {
        self.kelly_stats = kelly_stats;
        self
    }

    /// Replays `dataset` one trading day at a time per §4.4's six steps.
    pub fn run(&self, dataset: &Dataset) -> SimulatorOutput {
        let mut cash = self.backtest.initial_capital;
        let mut open_positions: Vec<Position> = Vec::new();
        let mut trades = Vec::new();
        let mut equity_curve = Vec::with_capacity(dataset.len());
        let mut daily_entry_log = Vec::new();
        let mut peak = cash;

        for (bar, chain) in dataset.iter() {
            self.mark_open_positions(&mut open_positions, chain, bar.date);
            self.process_exits(&mut open_positions, chain, bar, &mut cash, &mut trades);

            let positions_value: Decimal = open_positions.iter().map(costs::mark_value).sum();
            let total_value = cash + positions_value;
            peak = peak.max(total_value);
            let drawdown = if peak > Decimal::ZERO { (total_value - peak) / peak } else { Decimal::ZERO };
            equity_curve.push(EquityPoint {
                date: bar.date,
                cash,
                positions_value,
                total_value,
                drawdown_from_peak: drawdown,
            });

            self.process_entries(chain, bar, &mut open_positions, &mut cash, total_value, &mut daily_entry_log);
        }

        SimulatorOutput { trades, equity_curve, daily_entry_log }
    }

    /// §4.4 step 2: mark every open position to today's chain. A leg
    /// whose quote (and nearest-strike fallback) is missing holds its
    /// prior mark rather than aborting the run.
    fn mark_open_positions(&self, open_positions: &mut [Position], chain: &crate::chains::OptionChain, today: chrono::NaiveDate) {
        for position in open_positions.iter_mut() {
            match mark_spread(position, chain, today) {
                Some(mark) => position.last_mark = positive_from_decimal(mark),
                None => warn!(position_id = %position.id, strategy = %position.strategy_id, date = %today, "no leg quote found for mark, holding prior value"),
            }
        }
    }

    /// §4.4 step 3: ask each open position's owning strategy whether
    /// today is an exit. Closed positions are moved (not cloned) into a
    /// `TradeRecord` with the round-trip cost folded into `commission`.
    fn process_exits(
        &self,
        open_positions: &mut Vec<Position>,
        chain: &crate::chains::OptionChain,
        bar: &UnderlyingBar,
        cash: &mut Decimal,
        trades: &mut Vec<TradeRecord>,
    ) {
        let mut still_open = Vec::with_capacity(open_positions.len());
        for position in open_positions.drain(..) {
            let exit_signal = self
                .strategy_by_id(&position.strategy_id)
                .and_then(|strategy| strategy.generate_exit(&position, chain, bar));

            match exit_signal {
                Some(signal) => {
                    let (pnl, cost, cash_delta) = costs::close_economics(&position, signal.price, &self.backtest);
                    *cash += cash_delta;
                    let mut closed = position;
                    closed.status = PositionStatus::Closed;
                    let trade = TradeRecord::close(
                        closed,
                        bar.date,
                        chain.underlying_price,
                        bar.vix,
                        bar.iv_percentile,
                        signal.price,
                        signal.reason,
                        pnl,
                        cost,
                    );
                    trades.push(trade);
                }
                None => still_open.push(position),
            }
        }
        *open_positions = still_open;
    }

    /// §4.4 step 5: each strategy gets at most one entry attempt per day,
    /// gated by the portfolio's position count and risk budget before the
    /// strategy is even asked for a signal.
    fn process_entries(
        &self,
        chain: &crate::chains::OptionChain,
        bar: &UnderlyingBar,
        open_positions: &mut Vec<Position>,
        cash: &mut Decimal,
        equity: Decimal,
        daily_entry_log: &mut Vec<DailyEntryLog>,
    ) {
        for strategy in &self.strategies {
            let reason = self.attempt_entry(strategy.as_ref(), chain, bar, open_positions, cash, equity);
            daily_entry_log.push(DailyEntryLog {
                date: bar.date,
                strategy_id: strategy.id().to_string(),
                trades_entered: (reason == EntryBlockedReason::Entered) as u8,
                attempted_entry: !matches!(reason, EntryBlockedReason::MaxPositionsReached | EntryBlockedReason::RiskBudgetExceeded),
                entry_blocked_reason: reason,
            });
        }
    }

    fn attempt_entry(
        &self,
        strategy: &dyn Strategy,
        chain: &crate::chains::OptionChain,
        bar: &UnderlyingBar,
        open_positions: &mut Vec<Position>,
        cash: &mut Decimal,
        equity: Decimal,
    ) -> EntryBlockedReason {
        if open_positions.len() as u32 >= self.sizing.max_positions {
            return EntryBlockedReason::MaxPositionsReached;
        }

        let equity_floor = equity.max(Decimal::ONE);
        let used_risk: Decimal = open_positions.iter().map(|p| p.max_loss.to_dec()).sum::<Decimal>() / equity_floor;
        let risk_budget = RiskBudget { max_risk_percent: self.sizing.max_risk_percent, used_risk_percent: used_risk };
        if risk_budget.remaining_percent() <= Decimal::ZERO {
            return EntryBlockedReason::RiskBudgetExceeded;
        }

        let Some(signal) = strategy.generate_entry(chain, bar, open_positions) else {
            return EntryBlockedReason::NoEntrySignal;
        };

        let account = AccountState { cash: *cash, equity };
        let kelly = self.kelly_stats.get(strategy.id());
        let contracts = strategy.size_position(&signal, &account, &self.sizing, kelly, &risk_budget);
        if contracts == 0 {
            return EntryBlockedReason::InsufficientCash;
        }

        let required = costs::cash_required(signal.entry_price, signal.max_loss, signal.is_credit, contracts);
        if required > *cash {
            return EntryBlockedReason::InsufficientCash;
        }

        *cash += costs::entry_cash_flow(signal.entry_price, signal.is_credit, contracts);

        let contracts_dec = Decimal::from(contracts);
        open_positions.push(Position {
            id: Uuid::new_v4(),
            strategy_id: signal.strategy_id,
            legs: signal.legs,
            entry_date: bar.date,
            entry_underlying: chain.underlying_price,
            entry_vix: bar.vix,
            entry_iv_percentile: bar.iv_percentile,
            entry_price: signal.entry_price,
            is_credit: signal.is_credit,
            contracts,
            max_profit: positive_from_decimal(signal.max_profit.to_dec() * contracts_dec),
            max_loss: positive_from_decimal(signal.max_loss.to_dec() * contracts_dec),
            stop_loss_price: None,
            profit_target_price: None,
            near_expiration: signal.near_expiration,
            far_expiration: signal.far_expiration,
            status: PositionStatus::Open,
            last_mark: signal.entry_price,
        });

        EntryBlockedReason::Entered
    }

    fn strategy_by_id(&self, id: &str) -> Option<&dyn Strategy> {
        self.strategies.iter().find(|s| s.id() == id).map(|s| s.as_ref())
    }
}

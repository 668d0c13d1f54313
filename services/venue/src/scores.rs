//! Scoreboard rendering
//!
//! A human-readable HTML page of account standings: cash, shares,
//! position watermarks and NAV (shares · last price + cash), all in the
//! account-slot order the ledger keeps. The engine supplies the data;
//! everything presentational lives here.

use matching_engine::Engine;

pub fn render(engine: &mut Engine) -> String {
    let mut page = format!(
        "<html><head><title>{venue} {symbol}</title></head><body><pre>{venue} {symbol}\n",
        venue = engine.venue(),
        symbol = engine.symbol(),
    );

    let last = engine.quote().last;
    if last == -1 {
        page.push_str("No trading activity yet.</pre></body></html>");
        return page;
    }

    page.push_str(&format!(
        "Current price: ${}.{:02}\n\n",
        last / 100,
        last % 100
    ));
    page.push_str(
        "             Account           USD $          Shares         Pos.min         Pos.max           NAV $\n",
    );

    for (_, account) in engine.accounts() {
        page.push_str(&format!(
            "{:>20} {:>15} {:>15} {:>15} {:>15} {:>15}\n",
            account.name,
            account.cents / 100,
            account.shares,
            account.posmin,
            account.posmax,
            account.nav(last) / 100,
        ));
    }

    let start = engine.start_time().to_string();
    let now = engine.timestamp();
    page.push_str(&format!(
        "\n  Start time: {}\nCurrent time: {}",
        start, now
    ));
    page.push_str("</pre></body></html>");
    page
}

//! Interface de terminal do submitter: barra de progresso e saída colorida.
//!
//! Usa `indicatif` para acompanhar as tentativas de um job e `console` para
//! estilizar o resumo final.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::scheduler::JobState;
use crate::stats::{StatsAccumulator, Summary};
use crate::submission::ParsedResponse;

/// Indicador visual de progresso para a execução de um job no terminal.
pub struct RunProgress {
    // Barra com uma posição por tentativa.
    pb: ProgressBar,
    // Estilo verde para taxa de sucesso total.
    green: Style,
    // Estilo vermelho para nenhuma submissão aceita.
    red: Style,
    // Estilo amarelo para sucesso parcial.
    yellow: Style,
}

impl RunProgress {
    /// Inicia a barra para `attempts` tentativas do job `name`.
    pub fn start(name: &str, attempts: u64) -> Self {
        let pb = ProgressBar::new(attempts);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {prefix} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_prefix(name.to_string());

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Avança uma tentativa e mostra os contadores correntes.
    pub fn tick(&self, stats: &StatsAccumulator, state: JobState) {
        self.pb.set_position(stats.sent_count());
        self.pb.set_message(format!(
            "ok {} rate {:.2} ({} left)",
            stats.ok_count(),
            stats.success_rate(),
            state.remaining_attempts
        ));
    }

    /// Finaliza a barra e imprime o resumo com cor conforme a taxa final.
    pub fn complete(&self, summary: &Summary, completed: bool) {
        self.pb.finish_and_clear();
        let style = summary_style(summary, &self.green, &self.yellow, &self.red);
        let mark = if completed { "✓" } else { "…" };
        println!(
            "  {} sent {} ok {} success rate {:.3}",
            style.apply_to(mark),
            summary.sent_total,
            summary.ok_total,
            summary.success_rate_final
        );
        if !completed {
            println!("  {}", self.yellow.apply_to("stopped at the time limit"));
        }
    }
}

fn summary_style<'a>(summary: &Summary, green: &'a Style, yellow: &'a Style, red: &'a Style) -> &'a Style {
    if summary.sent_total > 0 && summary.ok_total == summary.sent_total {
        green
    } else if summary.ok_total > 0 {
        yellow
    } else {
        red
    }
}

/// Imprime o resultado do parser no formato `ok=<bool> gasUsed=<n>`.
pub fn print_parsed(parsed: &ParsedResponse) {
    let style = if parsed.ok {
        Style::new().green()
    } else {
        Style::new().red()
    };
    println!(
        "ok={} gasUsed={}",
        style.apply_to(parsed.ok),
        parsed.gas_or_sentinel()
    );
}

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::agenda_service::AgendaService;
use super::cadastro::Cadastro;
use crate::models::{Agendamento, FiltroAgenda, StatusAgendamento, Tarefa};
use crate::store::Filtro;
use crate::utils::AppResult;

const SEM_CATEGORIA: &str = "sem_categoria";

/// Agregados do painel sobre um recorte da agenda
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estatisticas {
    pub total: usize,
    pub por_status: BTreeMap<&'static str, usize>,
    pub taxa_conclusao: f64,
    pub tempo_total_estimado: u32,
    pub tempo_total_real: u32,
    /// Média de `estimado / real * 100` sobre os agendamentos que têm os dois
    pub eficiencia_media: Option<f64>,
    pub minutos_por_funcionario: BTreeMap<String, u32>,
    pub minutos_por_categoria: BTreeMap<String, u32>,
}

/// Tarefas com `computar_horas = false` (almoço, pausas) contam no total e
/// nos status, mas ficam fora de todos os minutos.
pub fn calcular(agendamentos: &[Agendamento], tarefas: &[Tarefa]) -> Estatisticas {
    let por_id: HashMap<&str, &Tarefa> = tarefas.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut por_status: BTreeMap<&'static str, usize> =
        StatusAgendamento::todos().iter().map(|s| (s.as_str(), 0)).collect();
    let mut tempo_total_estimado = 0;
    let mut tempo_total_real = 0;
    let mut eficiencias = Vec::new();
    let mut minutos_por_funcionario = BTreeMap::new();
    let mut minutos_por_categoria = BTreeMap::new();

    for agendamento in agendamentos {
        *por_status.entry(agendamento.status.as_str()).or_default() += 1;

        let tarefa = por_id.get(agendamento.tarefa_id.as_str());
        if tarefa.map_or(false, |t| !t.computar_horas) {
            continue;
        }

        let estimado = tarefa.map_or(agendamento.duracao, |t| t.tempo_estimado);
        tempo_total_estimado += estimado;

        if let Some(real) = agendamento.tempo_real {
            tempo_total_real += real;
            if real > 0 {
                eficiencias.push(estimado as f64 / real as f64 * 100.0);
            }
        }

        *minutos_por_funcionario
            .entry(agendamento.funcionario_id.clone())
            .or_default() += agendamento.duracao;
        let categoria = tarefa.map_or(SEM_CATEGORIA, |t| t.categoria.as_str());
        *minutos_por_categoria.entry(categoria.to_string()).or_default() += agendamento.duracao;
    }

    let total = agendamentos.len();
    let concluidas = por_status
        .get(StatusAgendamento::Concluida.as_str())
        .copied()
        .unwrap_or(0);

    Estatisticas {
        total,
        por_status,
        taxa_conclusao: percentual(concluidas as f64, total as f64),
        tempo_total_estimado,
        tempo_total_real,
        eficiencia_media: (!eficiencias.is_empty())
            .then(|| arredondar(eficiencias.iter().sum::<f64>() / eficiencias.len() as f64)),
        minutos_por_funcionario,
        minutos_por_categoria,
    }
}

pub async fn gerar(agenda: &AgendaService, cadastro: &Cadastro, filtro: &FiltroAgenda) -> AppResult<Estatisticas> {
    let agendamentos = agenda.listar(filtro).await?;
    let tarefas: Vec<Tarefa> = cadastro.listar(&Filtro::new()).await?;

    let estatisticas = calcular(&agendamentos, &tarefas);
    tracing::debug!(
        "📊 Estatísticas: {} agendamento(s), {} min estimados",
        estatisticas.total,
        estatisticas.tempo_total_estimado
    );
    Ok(estatisticas)
}

fn percentual(parte: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        arredondar(parte / total * 100.0)
    }
}

fn arredondar(valor: f64) -> f64 {
    (valor * 10.0).round() / 10.0
}
